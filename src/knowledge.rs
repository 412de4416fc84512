//! Knowledge unit builder.
//!
//! Converts a (ticket, comments) pair into zero or one [`KnowledgeUnit`].
//! A ticket contributes knowledge only when at least one of its comments was
//! written by a support agent; the unit's text pairs the ticket description
//! with the agents' answers in a fixed template.

use crate::models::{Comment, KnowledgeUnit, Ticket};

/// Build a knowledge unit from a ticket and its comments.
///
/// Comments are filtered to those authored by an id in `support_ids`. If none
/// qualify, the ticket contributes nothing and `None` is returned. Qualifying
/// bodies are concatenated in their given order, separated by a single space.
///
/// The output text is exactly
/// `"Question: {description}\nAnswer: {joined bodies}"`. An empty description
/// is allowed and not validated here.
pub fn build_unit(
    ticket: &Ticket,
    comments: &[Comment],
    support_ids: &[i64],
) -> Option<KnowledgeUnit> {
    let answers: Vec<&str> = comments
        .iter()
        .filter(|c| support_ids.contains(&c.author_id))
        .map(|c| c.body.as_str())
        .collect();

    if answers.is_empty() {
        return None;
    }

    Some(KnowledgeUnit {
        text: format!(
            "Question: {}\nAnswer: {}",
            ticket.description,
            answers.join(" ")
        ),
        ticket_id: ticket.id,
        status: ticket.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketStatus;

    fn ticket(id: i64, status: TicketStatus, description: &str) -> Ticket {
        Ticket {
            id,
            status,
            subject: None,
            description: description.to_string(),
        }
    }

    fn comment(author_id: i64, body: &str) -> Comment {
        Comment {
            id: 0,
            author_id,
            body: body.to_string(),
            public: true,
        }
    }

    #[test]
    fn test_printer_scenario() {
        let t = ticket(1, TicketStatus::Solved, "Printer won't turn on");
        let comments = vec![comment(111, "Check the power cable")];
        let unit = build_unit(&t, &comments, &[111]).unwrap();
        assert_eq!(
            unit.text,
            "Question: Printer won't turn on\nAnswer: Check the power cable"
        );
        assert_eq!(unit.ticket_id, 1);
        assert_eq!(unit.status, TicketStatus::Solved);
    }

    #[test]
    fn test_no_support_comments_yields_none() {
        let t = ticket(2, TicketStatus::Solved, "Screen flickers");
        let comments = vec![comment(999, "me too"), comment(998, "+1")];
        assert!(build_unit(&t, &comments, &[111]).is_none());
    }

    #[test]
    fn test_no_comments_yields_none() {
        let t = ticket(3, TicketStatus::Solved, "Laptop is slow");
        assert!(build_unit(&t, &[], &[111]).is_none());
    }

    #[test]
    fn test_answers_joined_by_single_space_in_order() {
        let t = ticket(4, TicketStatus::Solved, "VPN drops");
        let comments = vec![
            comment(111, "Update the client."),
            comment(999, "happens to me too"),
            comment(112, "Then reboot."),
        ];
        let unit = build_unit(&t, &comments, &[111, 112]).unwrap();
        assert_eq!(
            unit.text,
            "Question: VPN drops\nAnswer: Update the client. Then reboot."
        );
    }

    #[test]
    fn test_empty_description_allowed() {
        let t = ticket(5, TicketStatus::Solved, "");
        let comments = vec![comment(111, "Closing as duplicate")];
        let unit = build_unit(&t, &comments, &[111]).unwrap();
        assert_eq!(unit.text, "Question: \nAnswer: Closing as duplicate");
    }
}
