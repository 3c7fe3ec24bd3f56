//! Demo data for offline mode.
//!
//! Seeds the in-memory sources so every console screen has something to
//! show without a backend.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use console_core::Result;
use console_core::conversation::{
    Conversation, DeliveryStatus, Message, Participant, SenderRole,
};
use console_core::record::{EntityKind, FieldValue, LookupSource, Record, RecordFields, RecordStatus};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn record(index: usize, status: RecordStatus, fields: &[(&str, FieldValue)]) -> Record {
    let created_at = epoch() + Duration::hours(index as i64 * 7);
    Record {
        id: format!("demo-{index:03}"),
        fields: fields
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect::<RecordFields>(),
        status,
        created_at,
        updated_at: created_at,
    }
}

const MODULES: [(&str, &str); 12] = [
    ("Billing", "finance"),
    ("Invoices", "finance"),
    ("Payroll", "finance"),
    ("Audit Log", "security"),
    ("Single Sign-On", "security"),
    ("Two-Factor Auth", "security"),
    ("Campaigns", "marketing"),
    ("Broadcasts", "marketing"),
    ("Contacts", "crm"),
    ("Pipelines", "crm"),
    ("Reports", "analytics"),
    ("Dashboards", "analytics"),
];

const ORGANIZATIONS: [(&str, &str, &str, &str); 8] = [
    ("Acme Traders", "India", "Maharashtra", "Mumbai"),
    ("Blue Lotus Foods", "India", "Karnataka", "Bengaluru"),
    ("Copperleaf Labs", "India", "Maharashtra", "Pune"),
    ("Daybreak Clinics", "United States", "California", "San Diego"),
    ("Evergreen Logistics", "United States", "Texas", "Austin"),
    ("Fjord Outfitters", "Norway", "Oslo", "Oslo"),
    ("Granite Insurance", "United States", "California", "Fresno"),
    ("Harbor Books", "Norway", "Vestland", "Bergen"),
];

const TEMPLATES: [(&str, &str, &str, &str); 6] = [
    ("order_confirmation", "transactional", "en", "APPROVED"),
    ("delivery_update", "transactional", "en", "APPROVED"),
    ("payment_reminder", "transactional", "hi", "PENDING"),
    ("festive_offer", "marketing", "hi", "REJECTED"),
    ("welcome_message", "marketing", "en", "APPROVED"),
    ("otp_code", "authentication", "en", "PENDING"),
];

/// Demo records for one entity kind.
pub fn records(kind: EntityKind) -> Vec<Record> {
    match kind {
        EntityKind::Module => MODULES
            .iter()
            .enumerate()
            .map(|(i, (name, category))| {
                record(
                    i,
                    RecordStatus::from(i % 4 != 3),
                    &[
                        ("name", (*name).into()),
                        ("category", (*category).into()),
                        ("order", (i as i64 + 1).into()),
                    ],
                )
            })
            .collect(),
        EntityKind::Organization => ORGANIZATIONS
            .iter()
            .enumerate()
            .map(|(i, (name, country, state, city))| {
                let slug: String = name
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_lowercase();
                record(
                    i,
                    RecordStatus::from(i != 5),
                    &[
                        ("name", (*name).into()),
                        ("email", format!("admin@{slug}.example").into()),
                        ("country", (*country).into()),
                        ("state", (*state).into()),
                        ("city", (*city).into()),
                    ],
                )
            })
            .collect(),
        EntityKind::Template => TEMPLATES
            .iter()
            .enumerate()
            .map(|(i, (name, category, language, status))| {
                record(
                    i,
                    RecordStatus::Named(status.to_string()),
                    &[
                        ("name", (*name).into()),
                        ("category", (*category).into()),
                        ("language", (*language).into()),
                        ("body", format!("Hello {{{{1}}}}, this is {name}.").into()),
                    ],
                )
            })
            .collect(),
    }
}

fn message(
    conversation_id: &str,
    index: usize,
    sender: SenderRole,
    body: &str,
    at: DateTime<Utc>,
) -> Message {
    Message {
        id: format!("{conversation_id}-m{index}"),
        conversation_id: conversation_id.to_string(),
        sender,
        body: body.to_string(),
        timestamp: at,
        status: match sender {
            SenderRole::Operator => DeliveryStatus::Read,
            SenderRole::Counterpart => DeliveryStatus::Delivered,
        },
    }
}

fn conversation(
    id: &str,
    name: &str,
    phone: &str,
    unread: u32,
    lines: &[(SenderRole, &str, i64)],
) -> Conversation {
    let mut conversation = Conversation::new(
        id,
        Participant {
            id: format!("p-{id}"),
            name: name.to_string(),
            phone: Some(phone.to_string()),
        },
    );
    conversation.messages = lines
        .iter()
        .enumerate()
        .map(|(i, (sender, body, minutes))| {
            message(id, i, *sender, body, epoch() + Duration::minutes(*minutes))
        })
        .collect();
    conversation.unread_count = unread;
    conversation
}

/// Demo inbox. The store recomputes the denormalized fields on load.
pub fn conversations() -> Vec<Conversation> {
    use SenderRole::{Counterpart, Operator};
    vec![
        conversation(
            "c1",
            "Priya Sharma",
            "+91 98200 00001",
            2,
            &[
                (Counterpart, "Hi, my order has not arrived yet", 10),
                (Operator, "Sorry about that, let me check", 12),
                (Counterpart, "Order #4411", 13),
                (Counterpart, "Any update?", 95),
            ],
        ),
        conversation(
            "c2",
            "Daniel Okafor",
            "+1 415 555 0102",
            0,
            &[
                (Counterpart, "Can I change my billing address?", 30),
                (Operator, "Yes, under Settings > Billing", 31),
            ],
        ),
        conversation(
            "c3",
            "Ingrid Nilsen",
            "+47 400 00 003",
            1,
            &[(Counterpart, "Do you ship to Bergen?", 60)],
        ),
        conversation("c4", "Ravi Patel", "+91 98200 00004", 0, &[]),
    ]
}

/// Lookup source answering from the demo records.
#[derive(Debug, Default, Clone)]
pub struct DemoLookupSource;

fn distinct(kind: EntityKind, field: &str, filter: impl Fn(&Record) -> bool) -> Vec<String> {
    let mut values: Vec<String> = records(kind)
        .iter()
        .filter(|r| filter(r))
        .filter_map(|r| r.text(field).map(str::to_string))
        .collect();
    values.sort();
    values.dedup();
    values
}

#[async_trait]
impl LookupSource for DemoLookupSource {
    async fn categories(&self, kind: EntityKind) -> Result<Vec<String>> {
        Ok(match kind {
            EntityKind::Organization => Vec::new(),
            other => distinct(other, "category", |_| true),
        })
    }

    async fn countries(&self) -> Result<Vec<String>> {
        Ok(distinct(EntityKind::Organization, "country", |_| true))
    }

    async fn states(&self, country: &str) -> Result<Vec<String>> {
        Ok(distinct(EntityKind::Organization, "state", |r| {
            r.text("country").is_some_and(|c| c.eq_ignore_ascii_case(country))
        }))
    }

    async fn cities(&self, state: &str) -> Result<Vec<String>> {
        Ok(distinct(EntityKind::Organization, "city", |r| {
            r.text("state").is_some_and(|s| s.eq_ignore_ascii_case(state))
        }))
    }

    async fn languages(&self) -> Result<Vec<String>> {
        Ok(distinct(EntityKind::Template, "language", |_| true))
    }
}
