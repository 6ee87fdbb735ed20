use chrono::{DateTime, Utc};
use std::fmt;

// Define an enum for message types

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Error,
    Warning,
    Info,
    Priority,
    Status,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl MessageType {
    pub fn to_str(&self) -> &'static str {
        match self {
            MessageType::Error => "Error",
            MessageType::Warning => "Warning",
            MessageType::Info => "Info",
            MessageType::Priority => "Priority",
            MessageType::Status => "Status",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            MessageType::Error => "\x1b[31m",
            MessageType::Warning => "\x1b[33m",
            MessageType::Info => "\x1b[0m",
            MessageType::Priority => "\x1b[32m",
            MessageType::Status => "\x1b[36m",
        }
    }
}

#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub timestamp: DateTime<Utc>,
    pub message_type: MessageType,
    pub content: String,
}

impl StatusMessage {
    pub fn new(message_type: MessageType, content: String) -> Self {
        StatusMessage {
            timestamp: Utc::now(),
            message_type,
            content,
        }
    }
}

/// Bounded history of operator-facing status messages.
///
/// When `echo` is set every message is also printed to stdout, coloured by
/// its type. Errors are echoed even when quiet.
pub struct MessageLog {
    messages: Vec<StatusMessage>,
    echo: bool,
    max_size: usize,
}

impl MessageLog {
    pub fn new(echo: bool, max_size: Option<usize>) -> Self {
        MessageLog {
            messages: Vec::new(),
            echo,
            max_size: max_size.unwrap_or(500),
        }
    }

    pub fn add_message(&mut self, message: StatusMessage) {
        if self.messages.len() == self.max_size {
            self.messages.remove(0);
        }

        if self.echo || message.message_type == MessageType::Error {
            let white = "\x1b[0m";
            println!(
                "{}{} | {:^8} | {}{}",
                message.message_type.color(),
                message.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                message.message_type.to_str(),
                message.content,
                white,
            )
        }

        self.messages.push(message);
    }

    pub fn info(&mut self, content: impl Into<String>) {
        self.add_message(StatusMessage::new(MessageType::Info, content.into()));
    }

    pub fn warning(&mut self, content: impl Into<String>) {
        self.add_message(StatusMessage::new(MessageType::Warning, content.into()));
    }

    pub fn error(&mut self, content: impl Into<String>) {
        self.add_message(StatusMessage::new(MessageType::Error, content.into()));
    }

    pub fn priority(&mut self, content: impl Into<String>) {
        self.add_message(StatusMessage::new(MessageType::Priority, content.into()));
    }

    pub fn status(&mut self, content: impl Into<String>) {
        self.add_message(StatusMessage::new(MessageType::Status, content.into()));
    }

    #[cfg(test)]
    fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }
}
