//! HTML email templates
//!
//! Templates are registered under `.html` names so tera escapes every
//! interpolated record field.

use serde::Serialize;
use tera::{Context, Tera};

use super::{MailError, OutgoingEmail};
use crate::config::AppConfig;
use crate::models::{Booking, Mentor};
use crate::services::reports::WeeklyReport;

const LAYOUT: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #1f2937; max-width: 640px; margin: 0 auto;">
  <h2 style="color: #4f46e5;">{% block title %}{% endblock title %}</h2>
  {% block content %}{% endblock content %}
  <p style="color: #6b7280; font-size: 12px;">MentorHub</p>
</body>
</html>"#;

const MENTOR_APPLICATION_ADMIN: &str = r#"{% extends "layout.html" %}
{% block title %}New mentor application{% endblock title %}
{% block content %}
<p><strong>{{ mentor.name }}</strong> ({{ mentor.email }}) applied as a mentor.</p>
<ul>
  <li>Domain: {{ mentor.domain }}</li>
  <li>Expertise: {{ mentor.expertise | join(sep=", ") }}</li>
  {% if mentor.company %}<li>Company: {{ mentor.company }}</li>{% endif %}
  {% if mentor.position %}<li>Position: {{ mentor.position }}</li>{% endif %}
  {% if mentor.experienceYears %}<li>Experience: {{ mentor.experienceYears }} years</li>{% endif %}
  {% if mentor.hourlyRate %}<li>Hourly rate: {{ mentor.hourlyRate }}</li>{% endif %}
  {% if mentor.linkedin %}<li>LinkedIn: {{ mentor.linkedin }}</li>{% endif %}
</ul>
<p>{{ mentor.bio }}</p>
<p><a href="{{ verify_link | safe }}">Verify this mentor</a></p>
<p>This link works once.</p>
{% endblock content %}"#;

const MENTOR_APPLICATION_RECEIVED: &str = r#"{% extends "layout.html" %}
{% block title %}Application received{% endblock title %}
{% block content %}
<p>Hi {{ mentor.name }},</p>
<p>Thanks for applying to mentor founders in {{ mentor.domain }}. We review every application and will email you once yours is approved.</p>
{% endblock content %}"#;

const MENTOR_APPROVED: &str = r#"{% extends "layout.html" %}
{% block title %}You're approved{% endblock title %}
{% block content %}
<p>Hi {{ mentor.name }},</p>
<p>Your mentor profile is now live. Founders can find you and book sessions.</p>
{% endblock content %}"#;

const BOOKING_DETAILS: &str = r#"<ul>
  <li>Session: {{ booking.sessionDetails.sessionType }} ({{ booking.sessionDetails.durationMinutes }} minutes)</li>
  <li>When: {{ booking.sessionDetails.scheduledDate }} at {{ booking.sessionDetails.scheduledTime }}</li>
  {% if booking.sessionDetails.topic %}<li>Topic: {{ booking.sessionDetails.topic }}</li>{% endif %}
  <li>Amount: {{ booking.payment.amount | round(precision=2) }} {{ booking.payment.currency }}</li>
</ul>
{% if booking.sessionDetails.notes %}<p>Notes: {{ booking.sessionDetails.notes }}</p>{% endif %}"#;

const BOOKING_MENTOR: &str = r#"{% extends "layout.html" %}
{% block title %}New session booked{% endblock title %}
{% block content %}
<p>Hi {{ booking.mentorName }},</p>
<p>{{ booking.mentee.name }} ({{ booking.mentee.email }}{% if booking.mentee.company %}, {{ booking.mentee.company }}{% endif %}) booked a session with you.</p>
{% include "booking_details.html" %}
{% endblock content %}"#;

const BOOKING_MENTEE: &str = r#"{% extends "layout.html" %}
{% block title %}Your session is booked{% endblock title %}
{% block content %}
<p>Hi {{ booking.mentee.name }},</p>
<p>Your session with {{ booking.mentorName }} is scheduled.</p>
{% include "booking_details.html" %}
{% endblock content %}"#;

const BOOKING_ADMIN: &str = r#"{% extends "layout.html" %}
{% block title %}Booking {{ booking.id }}{% endblock title %}
{% block content %}
<p>{{ booking.mentee.name }} ({{ booking.mentee.email }}) booked {{ booking.mentorName }}.</p>
{% include "booking_details.html" %}
{% endblock content %}"#;

const WEEKLY_REPORT: &str = r#"{% extends "layout.html" %}
{% block title %}Weekly bookings report{% endblock title %}
{% block content %}
<p>{{ report.periodStart | truncate(length=10, end="") }} to {{ report.periodEnd | truncate(length=10, end="") }}: {{ report.totalBookings }} bookings.</p>
{% if report.topMentors %}
<h3>Top mentors</h3>
<ol>
{% for entry in report.topMentors %}  <li>{{ entry.mentorName }}: {{ entry.bookings }}</li>
{% endfor %}</ol>
{% endif %}
<h3>All mentors</h3>
{% if report.mentors %}
<table>
  <tr><th>#</th><th>Mentor</th><th>Bookings</th></tr>
{% for entry in report.mentors %}  <tr><td>{{ entry.rank }}</td><td>{{ entry.mentorName }}</td><td>{{ entry.bookings }}</td></tr>
{% endfor %}</table>
{% else %}
<p>No bookings this week.</p>
{% endif %}
<h3>By status</h3>
<ul>
{% for status, count in report.statusCounts %}  <li>{{ status }}: {{ count }}</li>
{% endfor %}</ul>
{% endblock content %}"#;

/// Renders every message the service sends
pub struct EmailTemplates {
    tera: Tera,
    admin_email: String,
}

impl EmailTemplates {
    pub fn new(admin_email: impl Into<String>) -> Result<Self, MailError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", LAYOUT),
            ("booking_details.html", BOOKING_DETAILS),
            ("mentor_application_admin.html", MENTOR_APPLICATION_ADMIN),
            ("mentor_application_received.html", MENTOR_APPLICATION_RECEIVED),
            ("mentor_approved.html", MENTOR_APPROVED),
            ("booking_mentor.html", BOOKING_MENTOR),
            ("booking_mentee.html", BOOKING_MENTEE),
            ("booking_admin.html", BOOKING_ADMIN),
            ("weekly_report.html", WEEKLY_REPORT),
        ])?;

        Ok(Self {
            tera,
            admin_email: admin_email.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, MailError> {
        Self::new(config.mail.admin_email.clone())
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    fn render<T: Serialize>(
        &self,
        template: &str,
        key: &str,
        value: &T,
        extra: &[(&str, &str)],
    ) -> Result<String, MailError> {
        let mut context = Context::new();
        context.insert(key, value);
        for (name, val) in extra {
            context.insert(*name, val);
        }
        Ok(self.tera.render(template, &context)?)
    }

    /// Admin notice carrying the single-use verification link
    pub fn mentor_application_admin(
        &self,
        mentor: &Mentor,
        verify_link: &str,
    ) -> Result<OutgoingEmail, MailError> {
        Ok(OutgoingEmail {
            to: self.admin_email.clone(),
            subject: format!("New mentor application: {}", mentor.name),
            html: self.render(
                "mentor_application_admin.html",
                "mentor",
                mentor,
                &[("verify_link", verify_link)],
            )?,
        })
    }

    pub fn mentor_application_received(&self, mentor: &Mentor) -> Result<OutgoingEmail, MailError> {
        Ok(OutgoingEmail {
            to: mentor.email.clone(),
            subject: "We received your mentor application".to_string(),
            html: self.render("mentor_application_received.html", "mentor", mentor, &[])?,
        })
    }

    pub fn mentor_approved(&self, mentor: &Mentor) -> Result<OutgoingEmail, MailError> {
        Ok(OutgoingEmail {
            to: mentor.email.clone(),
            subject: "Your mentor profile is approved".to_string(),
            html: self.render("mentor_approved.html", "mentor", mentor, &[])?,
        })
    }

    pub fn booking_for_mentor(
        &self,
        booking: &Booking,
        mentor_email: &str,
    ) -> Result<OutgoingEmail, MailError> {
        Ok(OutgoingEmail {
            to: mentor_email.to_string(),
            subject: format!("New session booked by {}", booking.mentee.name),
            html: self.render("booking_mentor.html", "booking", booking, &[])?,
        })
    }

    pub fn booking_for_mentee(&self, booking: &Booking) -> Result<OutgoingEmail, MailError> {
        Ok(OutgoingEmail {
            to: booking.mentee.email.clone(),
            subject: format!("Your session with {} is booked", booking.mentor_name),
            html: self.render("booking_mentee.html", "booking", booking, &[])?,
        })
    }

    pub fn booking_for_admin(&self, booking: &Booking) -> Result<OutgoingEmail, MailError> {
        Ok(OutgoingEmail {
            to: self.admin_email.clone(),
            subject: format!(
                "Booking: {} with {}",
                booking.mentee.name, booking.mentor_name
            ),
            html: self.render("booking_admin.html", "booking", booking, &[])?,
        })
    }

    pub fn weekly_report(&self, report: &WeeklyReport) -> Result<OutgoingEmail, MailError> {
        Ok(OutgoingEmail {
            to: self.admin_email.clone(),
            subject: format!(
                "Weekly bookings report: {} bookings",
                report.total_bookings
            ),
            html: self.render("weekly_report.html", "report", report, &[])?,
        })
    }
}
