//! Test data

use header_mapping::WireMessage;

pub const SAMPLE_CONFIG: &str = r#"
[logging]
level = "debug"

[store]
capacity = 16

[splitter]
name = "e2e"
copy_inbound_headers = true
"#;

/// A wire message with a tenant property, as a broker would deliver it
pub fn order_lines(body: &str, tenant: &str) -> WireMessage {
    WireMessage::new(body).with_property("tenant", tenant)
}
