//! # Schema Command Handler
//!
//! `dsctl schema <create|list|get|update|delete|validate>`.

use serde_json::Value;

use crate::commands::shared::{
    dispatch_command, parse_document_or_exit, parse_id_or_exit, validate_args_count_or_exit,
};
use crate::http_utils::{DynaschemaClient, execute_or_exit};
use crate::router::MessageResponse;
use crate::schema::{CreateSchemaRequest, UpdateSchemaRequest};
use crate::{
    Schema, SchemaId, ValidationLimits, cli_utils,
    validate_schema_structure_with_limits,
};

const SCHEMA_USAGE: &str =
    "Usage: dsctl schema <create|list|get|update|delete|validate> [args...]";

/// Handles all schema-related commands.
///
/// # Arguments
/// * `args` - Command arguments (first element is the subcommand)
/// * `client` - HTTP client for API communication
/// * `output_format` - Output format for printed records
pub async fn handle_schema_command(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    dispatch_command!("schema", SCHEMA_USAGE, args, client, output_format, {
        "create" => handle_schema_create,
        "list" => handle_schema_list,
        "get" => handle_schema_get,
        "update" => handle_schema_update,
        "delete" => handle_schema_delete,
        "validate" => handle_schema_validate,
    });
}

/// Exits unless `attributes` is a structurally valid attribute map.
fn require_valid_attributes(attributes: &serde_json::Map<String, Value>) {
    let result = validate_schema_structure_with_limits(attributes, &ValidationLimits::default());
    if let Err(e) = result.into_structural() {
        cli_utils::exit_with_error(&crate::commands::errors::format_cli_error(&e));
    }
}

pub(crate) fn request_or_exit<T>(parsed: Result<T, crate::ApiError>) -> T {
    parsed.unwrap_or_else(|e| cli_utils::exit_with_error(&e.body().message))
}

async fn handle_schema_create(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        3,
        3,
        "create",
        r#"Usage: dsctl schema create <name> <attributes-json|file>
Example: dsctl schema create person '{"firstName":{"type":"string"},"age":{"type":"number"}}'"#,
    );

    let attributes = parse_document_or_exit(&args[2]);
    let body = serde_json::json!({"name": args[1], "attributes": attributes});
    let request = request_or_exit(CreateSchemaRequest::from_body(&body));
    require_valid_attributes(&request.attributes);

    let schema = execute_or_exit(
        || client.post::<CreateSchemaRequest, Schema>("schemas", &request),
        "Failed to create schema",
    )
    .await;

    println!("Created schema:");
    cli_utils::print_formatted_or_exit(&schema, output_format, "schema");
}

async fn handle_schema_list(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: dsctl schema list");

    let schemas = execute_or_exit(
        || client.get::<Vec<Schema>>("schemas"),
        "Failed to list schemas",
    )
    .await;

    cli_utils::print_formatted_or_exit(&schemas, output_format, "schemas");
}

async fn handle_schema_get(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 2, 2, "get", "Usage: dsctl schema get <schema-id>");

    let schema_id: SchemaId = parse_id_or_exit(&args[1]);
    let path = format!("schemas/{}", schema_id);
    let schema = execute_or_exit(
        || client.get::<Schema>(&path),
        &format!("Failed to get schema {}", schema_id),
    )
    .await;

    cli_utils::print_formatted_or_exit(&schema, output_format, "schema");
}

async fn handle_schema_update(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        3,
        3,
        "update",
        r#"Usage: dsctl schema update <schema-id> <request-json|file>
The request may carry "name", "attributes", or both.
Example: dsctl schema update 67e55044-10b1-426f-9247-bb680e5fe0c8 '{"name":"people"}'"#,
    );

    let schema_id: SchemaId = parse_id_or_exit(&args[1]);
    let body = parse_document_or_exit(&args[2]);
    let request = request_or_exit(UpdateSchemaRequest::from_body(&body));
    if let Some(attributes) = &request.attributes {
        require_valid_attributes(attributes);
    }

    let path = format!("schemas/{}", schema_id);
    let schema = execute_or_exit(
        || client.put::<UpdateSchemaRequest, Schema>(&path, &request),
        &format!("Failed to update schema {}", schema_id),
    )
    .await;

    println!("Updated schema:");
    cli_utils::print_formatted_or_exit(&schema, output_format, "schema");
}

async fn handle_schema_delete(
    args: &[String],
    client: &DynaschemaClient,
    _output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "delete",
        "Usage: dsctl schema delete <schema-id>",
    );

    let schema_id: SchemaId = parse_id_or_exit(&args[1]);
    let path = format!("schemas/{}", schema_id);
    let response = execute_or_exit(
        || client.delete::<MessageResponse>(&path),
        &format!("Failed to delete schema {}", schema_id),
    )
    .await;

    println!("{}", response.message);
}

/// Validates an attribute map locally; no server is contacted.
async fn handle_schema_validate(
    args: &[String],
    _client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "validate",
        "Usage: dsctl schema validate <attributes-json|file>",
    );

    let attributes = parse_document_or_exit(&args[1]);
    let result = match attributes.as_object() {
        Some(map) => validate_schema_structure_with_limits(map, &ValidationLimits::default()),
        None => cli_utils::exit_with_error("Invalid attributes: expected an object"),
    };

    cli_utils::print_formatted_or_exit(&result, output_format, "validation result");
    if !result.is_valid {
        std::process::exit(1);
    }
}
