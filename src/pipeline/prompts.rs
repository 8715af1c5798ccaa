//! Instructions and payloads for the three generation stages.
//!
//! The constraints stated here (word limits, no placeholders, profile facts
//! only) are requests to the model; nothing checks the output against them.

use crate::config::{RecipientConfig, SenderIdentity};

pub const TOPIC_MATCHER_SYSTEM: &str = "You are an academic advisor. Find the specific research \
overlaps between a prospective student and a professor. Be concise and precise. Reply with 3-5 \
bullet points only, each tied to a paper or topic that appears in the professor profile you are given.";

pub const EMAIL_COMPOSER_SYSTEM: &str = "You are an expert academic writing assistant. Write a \
sincere, specific PhD interest email that is professional and warm rather than generic. Keep it \
under 250 words. Mention concrete papers or research areas from the supplied profile and nothing \
that is not in it. Never use placeholders such as [insert paper title].";

pub const TONE_REVIEWER_SYSTEM: &str = "You are a professional editor for academic email. Improve \
the tone of the email so it is:\n\
  - confident but not arrogant\n\
  - warm but not overly casual\n\
  - specific rather than generic\n\
  - under 250 words\n\
  - free of placeholder text like [insert ...]\n\
Keep the SUBJECT: line. Return the complete improved email only, with no commentary.";

pub fn topic_matcher_user(profile: &str, sender_interests: &str) -> String {
    format!(
        "PROFESSOR PROFILE:\n{profile}\n\n\
         STUDENT INTERESTS:\n{sender_interests}\n\n\
         List the strongest research overlaps as short bullet points, citing specific papers or \
         research areas from the profile above."
    )
}

pub fn email_composer_user(
    profile: &str,
    matched_topics: &str,
    sender: &SenderIdentity,
    recipient: &RecipientConfig,
) -> String {
    let link = sender.profile_link.as_deref().unwrap_or("");
    let to = if recipient.institution.is_empty() {
        format!("Professor {}", recipient.name)
    } else {
        format!("Professor {}, {}", recipient.name, recipient.institution)
    };
    format!(
        "Write a PhD interest email with these details:\n\n\
         FROM: {name} ({program})\n\
         TO: {to}\n\n\
         PROFESSOR'S RESEARCH:\n{profile}\n\n\
         MATCHED TOPICS:\n{matched_topics}\n\n\
         STUDENT INTERESTS:\n{interests}\n\n\
         STUDENT CONTACT: {contact}\n\
         STUDENT PROFILE LINK: {link}\n\n\
         Write the full email including a subject line. Sign off with the student's name and \
         contact details, and the profile link only if it is not blank. Do not use placeholder \
         text like [Your Contact Information]. Format as:\nSUBJECT: ...\n\n[email body]",
        name = sender.name,
        program = sender.program,
        interests = sender.interests,
        contact = sender.contact,
    )
}

pub fn tone_reviewer_user(draft: &str) -> String {
    format!("Review and improve this PhD email:\n\n{draft}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender(link: Option<&str>) -> SenderIdentity {
        SenderIdentity {
            name: "Ada Student".into(),
            program: "MSc Computing".into(),
            interests: "graph learning".into(),
            contact: "ada@student.edu".into(),
            profile_link: link.map(str::to_string),
        }
    }

    fn recipient(institution: &str) -> RecipientConfig {
        RecipientConfig {
            name: "Michael Zhang".into(),
            institution: institution.into(),
            email: "prof@uni.edu".into(),
            primary_url: String::new(),
            secondary_url: String::new(),
            secondary_label: "SMU website".into(),
        }
    }

    #[test]
    fn composer_payload_carries_identity_and_profile() {
        let payload = email_composer_user(
            "PROFESSOR: Michael Zhang",
            "- GNNs",
            &sender(Some("https://linkedin.com/in/ada")),
            &recipient("Saint Mary's University"),
        );
        assert!(payload.contains("FROM: Ada Student (MSc Computing)"));
        assert!(payload.contains("TO: Professor Michael Zhang, Saint Mary's University"));
        assert!(payload.contains("PROFESSOR'S RESEARCH:\nPROFESSOR: Michael Zhang"));
        assert!(payload.contains("MATCHED TOPICS:\n- GNNs"));
        assert!(payload.contains("STUDENT PROFILE LINK: https://linkedin.com/in/ada"));
    }

    #[test]
    fn composer_payload_without_institution_or_link() {
        let payload = email_composer_user("p", "t", &sender(None), &recipient(""));
        assert!(payload.contains("TO: Professor Michael Zhang\n"));
        assert!(payload.contains("STUDENT PROFILE LINK: \n"));
    }

    #[test]
    fn matcher_payload_includes_both_sides() {
        let payload = topic_matcher_user("PROFILE TEXT", "my interests");
        assert!(payload.starts_with("PROFESSOR PROFILE:\nPROFILE TEXT"));
        assert!(payload.contains("STUDENT INTERESTS:\nmy interests"));
    }
}
