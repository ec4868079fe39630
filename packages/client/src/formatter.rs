//! Message formatting utilities for client display.

use stockhammer_server::infrastructure::dto::websocket::{ChatMessageDto, SafetyReportDto};
use stockhammer_shared::time::{parse_rfc3339_millis, timestamp_to_clock_label};

use crate::domain::Mirror;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Full mirror: safety board, numbered chat history and typing line
    pub fn format_snapshot(mirror: &Mirror, me: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n");
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&Self::format_family_members(&mirror.family_members, me));
        output.push_str("Messages:\n");
        if mirror.chat_messages.is_empty() {
            output.push_str("(No messages)\n");
        } else {
            for (i, message) in mirror.chat_messages.iter().enumerate() {
                output.push_str(&Self::format_chat_line(i + 1, message));
            }
        }
        output.push_str(&Self::format_typing(&mirror.others_typing(me)));
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Safety board, marking the current user
    pub fn format_family_members(reports: &[SafetyReportDto], me: &str) -> String {
        let mut output = String::from("Safe:\n");
        if reports.is_empty() {
            output.push_str("(Nobody has checked in)\n");
            return output;
        }
        for report in reports {
            let marker = if report.name == me { " (me)" } else { "" };
            output.push_str(&format!(
                "  ✔ {}{} - checked in at {}\n",
                report.name,
                marker,
                Self::clock_label(&report.timestamp)
            ));
        }
        output
    }

    /// One numbered chat line with its reactions
    pub fn format_chat_line(index: usize, message: &ChatMessageDto) -> String {
        let mut line = format!(
            "  #{} [{}] @{}: {}",
            index,
            Self::clock_label(&message.timestamp),
            message.sender,
            message.message
        );
        let reactions = Self::format_reactions(message);
        if !reactions.is_empty() {
            line.push_str("  ");
            line.push_str(&reactions);
        }
        line.push('\n');
        line
    }

    /// Reaction groups as `👍 2 ❤️ 1`
    pub fn format_reactions(message: &ChatMessageDto) -> String {
        message
            .reactions
            .iter()
            .map(|group| format!("{} {}", group.emoji, group.users.len()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Typing indicator line; empty when nobody else is typing
    pub fn format_typing(others: &[&str]) -> String {
        match others {
            [] => String::new(),
            [one] => format!("  {} is typing...\n", one),
            many => format!("  {} are typing...\n", many.join(", ")),
        }
    }

    pub fn format_sent_confirmation(sent_at: i64) -> String {
        format!("  (sent at {})\n", timestamp_to_clock_label(sent_at))
    }

    pub fn format_notice(text: &str) -> String {
        format!("\n! {}\n", text)
    }

    fn clock_label(timestamp: &str) -> String {
        parse_rfc3339_millis(timestamp)
            .map(timestamp_to_clock_label)
            .unwrap_or_else(|| timestamp.to_string())
    }
}
