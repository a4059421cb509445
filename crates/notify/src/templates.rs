//! Message bodies for workflow events.

/// Subject + html body for a first-time application, addressed to the
/// section's staff list.
pub fn new_application(student_name: &str, site_url: &str) -> (String, String) {
    (
        "New Bonafide Applied".to_string(),
        format!(
            "<h3>Your student {student_name} has applied for a new bonafide certificate.</h3>\
             <p><a href={site_url}>Click here</a> to view and approve the request.</p>"
        ),
    )
}

/// Subject + html body for a re-request, addressed to the section's staff
/// list.
pub fn re_request(student_name: &str, site_url: &str) -> (String, String) {
    (
        "Bonafide Re-request".to_string(),
        format!(
            "<h3>Your student {student_name} has re-requested your review for a bonafide certificate.</h3>\
             <p><a href={site_url}>Click here</a> to view and approve the request.</p>"
        ),
    )
}

/// Subject + html body for a decision notice, addressed to the student.
pub fn decision(student_name: &str, outcome: &str, site_url: &str) -> (String, String) {
    (
        format!("Bonafide Request {outcome}"),
        format!(
            "<h3>Dear {student_name}, your bonafide certificate request has been {outcome}.</h3>\
             <p><a href={site_url}>Click here</a> to view the details.</p>"
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_subject_carries_outcome() {
        let (subject, html) = decision("Arun", "approved", "https://records.univ.edu");
        assert_eq!(subject, "Bonafide Request approved");
        assert!(html.contains("Arun"));
        assert!(html.contains("approved"));
    }
}
