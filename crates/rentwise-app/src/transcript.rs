// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;

use crate::{ChatMessage, ChatRole, MessageId};

pub const GREETING: &str = "Hi! What kind of car do you want to rent today?";
pub const APOLOGY: &str =
    "Sorry, something went wrong while contacting the server. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    next_id: i64,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        transcript.push(ChatRole::Assistant, GREETING, None);
        transcript
    }
}

impl ChatTranscript {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(
        &mut self,
        role: ChatRole,
        content: &str,
        created_at: Option<OffsetDateTime>,
    ) -> MessageId {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            content: content.to_owned(),
            created_at,
        });
        id
    }

    pub fn push_user(&mut self, content: &str) -> MessageId {
        self.push(ChatRole::User, content, None)
    }

    pub fn push_apology(&mut self) -> MessageId {
        self.push(ChatRole::Assistant, APOLOGY, None)
    }

    /// Role/content pairs in send order, as the chat endpoint expects them.
    pub fn history(&self) -> Vec<(ChatRole, String)> {
        self.messages
            .iter()
            .map(|message| (message.role, message.content.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{APOLOGY, ChatTranscript, GREETING};
    use crate::{ChatRole, MessageId};

    #[test]
    fn new_transcript_starts_with_greeting() {
        let transcript = ChatTranscript::default();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, ChatRole::Assistant);
        assert_eq!(transcript.messages()[0].content, GREETING);
    }

    #[test]
    fn message_ids_increase() {
        let mut transcript = ChatTranscript::default();
        let first = transcript.push_user("an SUV please");
        let second = transcript.push_apology();
        assert_eq!(first, MessageId::new(2));
        assert_eq!(second, MessageId::new(3));
        assert_eq!(
            transcript.history().last(),
            Some(&(ChatRole::Assistant, APOLOGY.to_owned()))
        );
    }
}
