//! User-visible notification feed.
//!
//! The feed is the single user-facing channel for outcomes and errors of
//! every kind: entries append in arrival order and nothing is retried or
//! escalated past it. Anything a front end shows the user comes from here.

/// Who a feed entry speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Echo of something the user submitted
    User,
    /// AI reply, from the REST endpoint or the live channel
    Ai,
    /// Everything else: progress, errors, raw payloads
    System,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub sender: Option<String>,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
    seen: usize,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: NotificationKind,
        sender: Option<&str>,
        body: impl Into<String>,
    ) {
        self.items.push(Notification {
            kind,
            sender: sender.map(String::from),
            body: body.into(),
        });
    }

    pub fn user(&mut self, sender: &str, body: impl Into<String>) {
        self.push(NotificationKind::User, Some(sender), body);
    }

    pub fn ai(&mut self, body: impl Into<String>) {
        self.push(NotificationKind::Ai, None, body);
    }

    pub fn system(&mut self, body: impl Into<String>) {
        self.push(NotificationKind::System, None, body);
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Entries appended since the last call. Front ends use this to print
    /// incrementally without re-rendering the whole feed.
    pub fn unseen(&mut self) -> &[Notification] {
        let start = self.seen;
        self.seen = self.items.len();
        &self.items[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_arrival_order() {
        let mut feed = NotificationFeed::new();
        feed.user("you", "make it bold");
        feed.ai("done");
        feed.system("grid updated");

        let kinds: Vec<_> = feed.items().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::User,
                NotificationKind::Ai,
                NotificationKind::System,
            ]
        );
        assert_eq!(feed.items()[0].sender.as_deref(), Some("you"));
    }

    #[test]
    fn test_unseen_advances() {
        let mut feed = NotificationFeed::new();
        feed.system("one");
        feed.system("two");

        assert_eq!(feed.unseen().len(), 2);
        assert_eq!(feed.unseen().len(), 0);

        feed.system("three");
        let unseen = feed.unseen();
        assert_eq!(unseen.len(), 1);
        assert_eq!(unseen[0].body, "three");
    }
}
