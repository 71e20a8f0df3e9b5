//! Built-in message templates offered to every user.
//!
//! Bodies are spintax with `[field]` placeholders filled after resolution.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Whatsapp,
    Email,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageTemplate {
    pub id: &'static str,
    pub channel: Channel,
    pub title: &'static str,
    pub subject: Option<&'static str>,
    pub body: &'static str,
}

pub const TEMPLATES: &[MessageTemplate] = &[
    MessageTemplate {
        id: "wa_application_followup",
        channel: Channel::Whatsapp,
        title: "Follow up on an application",
        subject: None,
        body: "{Halo|Hai|Selamat siang} {Pak|Bu} [name], saya [sender] yang {melamar|mengirim lamaran} \
               untuk posisi [position] di [company]. {Apakah ada kabar terbaru|Boleh saya tahu perkembangannya} \
               {terkait lamaran saya|mengenai proses rekrutmennya}? {Terima kasih|Terima kasih banyak} \
               {atas waktunya|sebelumnya}.",
    },
    MessageTemplate {
        id: "wa_position_inquiry",
        channel: Channel::Whatsapp,
        title: "Ask whether a role is still open",
        subject: None,
        body: "{Hello|Hi|Hey} [name], {is the|I saw that the} [position] {position|role} at [company] \
               {is still open|might still be open}? {I'd love to apply|I'm very interested in applying}. \
               {Thanks|Thank you}!",
    },
    MessageTemplate {
        id: "wa_interview_thanks",
        channel: Channel::Whatsapp,
        title: "Thank the interviewer",
        subject: None,
        body: "{Hi|Hello} [name], {thank you|thanks a lot} for {your time|the conversation} {today|earlier} \
               about the [position] {role|position}. {I really enjoyed it|It was great to learn more about the team} \
               and {look forward to hearing from you|hope to hear back soon}.",
    },
    MessageTemplate {
        id: "email_application_followup",
        channel: Channel::Email,
        title: "Application follow-up email",
        subject: Some("{Following up|Follow-up} on my [position] application"),
        body: "{Dear|Hello} [name],\n\n{I hope you are doing well|I hope this message finds you well}. \
               I {recently applied|submitted my application} for the [position] {role|position} at [company] \
               and {wanted to follow up|would like to check in} on {its status|the hiring timeline}.\n\n\
               {I remain very interested in the opportunity|I am still very excited about this opportunity} \
               and {would be glad to|am happy to} {share any further information|answer any questions}.\n\n\
               {Best regards|Kind regards|Sincerely},\n[sender]",
    },
    MessageTemplate {
        id: "email_referral_request",
        channel: Channel::Email,
        title: "Ask a contact for a referral",
        subject: Some("{Quick question|A small request} about [company]"),
        body: "{Hi|Hello} [name],\n\n{I noticed|I saw} that [company] is hiring for a [position] \
               and {thought of you|remembered you work there}. {Would you be open to|Would you be comfortable with} \
               referring me {for the role|for this position}?\n\n{Happy to|I'd be glad to} send my CV \
               {if that helps|so you can take a look}.\n\n{Thanks|Thank you} {so much|in advance},\n[sender]",
    },
];

/// Looks up a built-in template by id.
pub fn find_template(id: &str) -> Option<&'static MessageTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Built-in templates, optionally restricted to one channel.
pub fn list_templates(channel: Option<Channel>) -> Vec<&'static MessageTemplate> {
    TEMPLATES
        .iter()
        .filter(|t| channel.map_or(true, |c| t.channel == c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spintax::validate;

    #[test]
    fn test_builtin_templates_are_valid_spintax() {
        for template in TEMPLATES {
            let report = validate(template.body);
            assert!(report.valid, "{}: {:?}", template.id, report.errors);
            if let Some(subject) = template.subject {
                assert!(validate(subject).valid, "{} subject", template.id);
            }
        }
    }

    #[test]
    fn test_email_templates_have_subjects() {
        for template in list_templates(Some(Channel::Email)) {
            assert!(template.subject.is_some(), "{} lacks a subject", template.id);
        }
        for template in list_templates(Some(Channel::Whatsapp)) {
            assert!(template.subject.is_none());
        }
    }

    #[test]
    fn test_template_ids_are_unique() {
        let mut ids: Vec<_> = TEMPLATES.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), TEMPLATES.len());
    }

    #[test]
    fn test_find_template() {
        assert_eq!(
            find_template("wa_position_inquiry").map(|t| t.channel),
            Some(Channel::Whatsapp)
        );
        assert!(find_template("missing").is_none());
    }

    #[test]
    fn test_list_all_templates() {
        assert_eq!(list_templates(None).len(), TEMPLATES.len());
    }
}
