//! What a producer hands back to the splitter

use message::Message;

/// One produced item: a bare payload to wrap, or a message to copy
#[derive(Debug)]
pub enum SplitItem<O> {
    Payload(O),
    Message(Message<O>),
}

/// Ordered result of one production step. Empty means "drop silently".
#[derive(Debug)]
pub struct SplitOutput<O> {
    items: Vec<SplitItem<O>>,
}

impl<O> SplitOutput<O> {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn one(payload: O) -> Self {
        Self {
            items: vec![SplitItem::Payload(payload)],
        }
    }

    pub fn message(message: Message<O>) -> Self {
        Self {
            items: vec![SplitItem::Message(message)],
        }
    }

    pub fn payloads(payloads: impl IntoIterator<Item = O>) -> Self {
        Self {
            items: payloads.into_iter().map(SplitItem::Payload).collect(),
        }
    }

    pub fn messages(messages: impl IntoIterator<Item = Message<O>>) -> Self {
        Self {
            items: messages.into_iter().map(SplitItem::Message).collect(),
        }
    }

    /// Append an item, for producers that mix payloads and messages
    pub fn push(&mut self, item: SplitItem<O>) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SplitItem<O>> {
        self.items.iter()
    }
}

impl<O> Default for SplitOutput<O> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<O> From<Vec<O>> for SplitOutput<O> {
    fn from(payloads: Vec<O>) -> Self {
        Self::payloads(payloads)
    }
}

/// `None` is the absent result
impl<O> From<Option<O>> for SplitOutput<O> {
    fn from(payload: Option<O>) -> Self {
        Self::payloads(payload)
    }
}

impl<O> FromIterator<O> for SplitOutput<O> {
    fn from_iter<I: IntoIterator<Item = O>>(iter: I) -> Self {
        Self::payloads(iter)
    }
}

impl<O> IntoIterator for SplitOutput<O> {
    type Item = SplitItem<O>;
    type IntoIter = std::vec::IntoIter<SplitItem<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert!(SplitOutput::<u8>::empty().is_empty());
        assert_eq!(SplitOutput::one(1u8).len(), 1);
        assert_eq!(SplitOutput::from(vec![1u8, 2, 3]).len(), 3);
        assert!(SplitOutput::<u8>::from(None).is_empty());
        assert_eq!(SplitOutput::from(Some(7u8)).len(), 1);

        let collected: SplitOutput<String> = "a.b".split('.').map(str::to_string).collect();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn test_mixed_items_keep_order() {
        let mut output = SplitOutput::one("first");
        output.push(SplitItem::Message(Message::new("second")));
        output.push(SplitItem::Payload("third"));

        let kinds: Vec<&str> = output
            .iter()
            .map(|item| match item {
                SplitItem::Payload(_) => "payload",
                SplitItem::Message(_) => "message",
            })
            .collect();
        assert_eq!(kinds, vec!["payload", "message", "payload"]);
    }
}
