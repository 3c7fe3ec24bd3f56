use anyhow::{Result, bail};
use console_core::list::{ListViewModel, MutationOutcome};
use console_core::record::{EntityKind, ExportFormat, FieldValue, RecordFields};

use super::print_notifications;
use crate::context::AppContext;

/// Parses `KEY=VALUE`; `true`/`false` and integers keep their JSON type.
pub fn parse_field(raw: &str) -> Result<(String, FieldValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    let value = match value {
        "true" => FieldValue::Bool(true),
        "false" => FieldValue::Bool(false),
        other => other
            .parse::<i64>()
            .map(FieldValue::Integer)
            .unwrap_or_else(|_| FieldValue::from(other)),
    };
    Ok((key.to_string(), value))
}

async fn finish<T>(vm: &ListViewModel, outcome: MutationOutcome<T>) -> Result<Option<T>> {
    print_notifications(&vm.take_notifications().await);
    match outcome {
        MutationOutcome::Succeeded(value) => Ok(Some(value)),
        MutationOutcome::Failed(err) => Err(err.into()),
    }
}

pub async fn delete(ctx: &AppContext, entity: EntityKind, ids: Vec<String>) -> Result<()> {
    let vm = ctx.list_view_model(entity, None)?;
    let outcome = match ids.as_slice() {
        [] => bail!("No ids given"),
        [id] => vm.delete(id).await?,
        many => vm.bulk_delete(many).await?,
    };
    finish(&vm, outcome).await?;
    Ok(())
}

pub async fn toggle(ctx: &AppContext, entity: EntityKind, id: String, active: bool) -> Result<()> {
    let vm = ctx.list_view_model(entity, None)?;
    let outcome = vm.toggle_active(&id, active).await?;
    if let Some(record) = finish(&vm, outcome).await? {
        println!("{} is now {}", record.id, record.status.filter_value());
    }
    Ok(())
}

pub async fn create(ctx: &AppContext, entity: EntityKind, fields: Vec<(String, FieldValue)>) -> Result<()> {
    let vm = ctx.list_view_model(entity, None)?;
    let fields: RecordFields = fields.into_iter().collect();
    let outcome = vm.create(fields).await?;
    if let Some(record) = finish(&vm, outcome).await? {
        println!("{}", record.id);
    }
    Ok(())
}

pub async fn update(
    ctx: &AppContext,
    entity: EntityKind,
    id: String,
    fields: Vec<(String, FieldValue)>,
) -> Result<()> {
    let vm = ctx.list_view_model(entity, None)?;
    let fields: RecordFields = fields.into_iter().collect();
    let outcome = vm.update(&id, fields).await?;
    finish(&vm, outcome).await?;
    Ok(())
}

pub async fn export(ctx: &AppContext, entity: EntityKind, format: ExportFormat) -> Result<()> {
    let vm = ctx.list_view_model(entity, None)?;
    let outcome = vm.export(format).await;
    if let Some(handle) = finish(&vm, outcome).await? {
        println!("{}", handle.download_url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_types() {
        assert_eq!(
            parse_field("name=Billing").unwrap(),
            ("name".to_string(), FieldValue::from("Billing"))
        );
        assert_eq!(
            parse_field("isActive=false").unwrap(),
            ("isActive".to_string(), FieldValue::Bool(false))
        );
        assert_eq!(
            parse_field("order=3").unwrap(),
            ("order".to_string(), FieldValue::Integer(3))
        );
        assert_eq!(
            parse_field("body=a=b").unwrap(),
            ("body".to_string(), FieldValue::from("a=b"))
        );
        assert!(parse_field("=x").is_err());
        assert!(parse_field("novalue").is_err());
    }
}
