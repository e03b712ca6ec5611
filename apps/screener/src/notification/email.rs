//! Outcome email content. Tone is picked by a fixed score threshold.

use serde::Serialize;

use crate::notification::Notification;

/// Scores at or above this get the congratulatory email.
pub const QUALIFYING_SCORE: f64 = 65.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTone {
    Congratulatory,
    Rejection,
}

impl EmailTone {
    pub fn for_score(score: f64) -> Self {
        if score >= QUALIFYING_SCORE {
            Self::Congratulatory
        } else {
            Self::Rejection
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedEmail {
    pub tone: EmailTone,
    pub subject: String,
    pub body: String,
}

pub fn compose_email(notification: &Notification, company_name: &str) -> ComposedEmail {
    let name = notification
        .candidate_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("Candidate");
    let job_title = &notification.job_title;
    let score = notification.score;
    let feedback = &notification.feedback;
    let tone = EmailTone::for_score(score);

    let (subject, body) = match tone {
        EmailTone::Congratulatory => (
            format!("Congratulations regarding your application for {job_title}!"),
            format!(
                "Dear {name},\n\n\
                Congratulations! We were impressed with your resume and qualifications for the \
                {job_title} position (Match Score: {score:.1}%).\n\n\
                Our recruitment team believes you could be a strong fit. Here is some initial \
                feedback based on our automated review:\n{feedback}\n\n\
                We would like to invite you to the next stage of the application process and will \
                be in touch soon with further details.\n\n\
                Best regards,\n{company_name} Recruitment Team\n"
            ),
        ),
        EmailTone::Rejection => (
            format!("Update regarding your application for {job_title}"),
            format!(
                "Dear {name},\n\n\
                Thank you for your interest in the {job_title} position at {company_name} and for \
                taking the time to apply.\n\n\
                After careful review, we have decided not to move forward with your candidacy for \
                this specific role at this time.\n\n\
                Our automated system provided the following feedback based on your resume against \
                the job requirements (Match Score: {score:.1}%):\n{feedback}\n\n\
                We encourage you to keep an eye on our careers page for future opportunities that \
                may be a better fit. We wish you the best in your job search.\n\n\
                Sincerely,\n{company_name} Recruitment Team\n"
            ),
        ),
    };

    ComposedEmail {
        tone,
        subject,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(score: f64, name: Option<&str>) -> Notification {
        Notification {
            address: Some("asha@example.com".to_string()),
            candidate_name: name.map(String::from),
            job_title: "Data Scientist".to_string(),
            score,
            feedback: "Great Python depth; add more cloud experience.".to_string(),
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(EmailTone::for_score(65.0), EmailTone::Congratulatory);
        assert_eq!(EmailTone::for_score(64.99), EmailTone::Rejection);
        assert_eq!(EmailTone::for_score(100.0), EmailTone::Congratulatory);
        assert_eq!(EmailTone::for_score(0.0), EmailTone::Rejection);
    }

    #[test]
    fn test_congratulatory_email() {
        let email = compose_email(&notification(82.0, Some("Asha Rao")), "Acme");
        assert_eq!(email.tone, EmailTone::Congratulatory);
        assert_eq!(
            email.subject,
            "Congratulations regarding your application for Data Scientist!"
        );
        assert!(email.body.starts_with("Dear Asha Rao,"));
        assert!(email.body.contains("(Match Score: 82.0%)"));
        assert!(email.body.contains("Great Python depth"));
        assert!(email.body.ends_with("Acme Recruitment Team\n"));
    }

    #[test]
    fn test_rejection_email_carries_feedback() {
        let email = compose_email(&notification(64.99, Some("Asha Rao")), "Acme");
        assert_eq!(email.tone, EmailTone::Rejection);
        assert_eq!(
            email.subject,
            "Update regarding your application for Data Scientist"
        );
        assert!(email.body.contains("(Match Score: 65.0%)"));
        assert!(email.body.contains("add more cloud experience"));
    }

    #[test]
    fn test_missing_name_falls_back_to_candidate() {
        let email = compose_email(&notification(40.0, None), "Acme");
        assert!(email.body.starts_with("Dear Candidate,"));
    }
}
