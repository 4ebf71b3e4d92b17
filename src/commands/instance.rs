//! # Instance Command Handler
//!
//! `dsctl instance <create|list|get|update|delete>`. Every subcommand takes the owning schema id
//! first.

use crate::commands::schema::request_or_exit;
use crate::commands::shared::{
    dispatch_command, parse_document_or_exit, parse_id_or_exit, validate_args_count_or_exit,
};
use crate::http_utils::{DynaschemaClient, execute_or_exit};
use crate::instance::InstanceRequest;
use crate::router::MessageResponse;
use crate::{Instance, InstanceId, SchemaId, cli_utils};

const INSTANCE_USAGE: &str = "Usage: dsctl instance <create|list|get|update|delete> [args...]";

/// Handles all instance-related commands.
///
/// # Arguments
/// * `args` - Command arguments (first element is the subcommand)
/// * `client` - HTTP client for API communication
/// * `output_format` - Output format for printed records
pub async fn handle_instance_command(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    dispatch_command!("instance", INSTANCE_USAGE, args, client, output_format, {
        "create" => handle_instance_create,
        "list" => handle_instance_list,
        "get" => handle_instance_get,
        "update" => handle_instance_update,
        "delete" => handle_instance_delete,
    });
}

fn instances_path(schema_id: &SchemaId) -> String {
    format!("schemas/{}/instances", schema_id)
}

fn instance_path(schema_id: &SchemaId, instance_id: &InstanceId) -> String {
    format!("schemas/{}/instances/{}", schema_id, instance_id)
}

async fn handle_instance_create(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        4,
        4,
        "create",
        r#"Usage: dsctl instance create <schema-id> <name> <data-json|file>
Example: dsctl instance create 67e55044-10b1-426f-9247-bb680e5fe0c8 john '{"firstName":"John","age":30}'"#,
    );

    let schema_id: SchemaId = parse_id_or_exit(&args[1]);
    let data = parse_document_or_exit(&args[3]);
    let body = serde_json::json!({"name": args[2], "data": data});
    let request = request_or_exit(InstanceRequest::from_body(&body, true));

    let path = instances_path(&schema_id);
    let instance = execute_or_exit(
        || client.post::<InstanceRequest, Instance>(&path, &request),
        "Failed to create instance",
    )
    .await;

    println!("Created instance:");
    cli_utils::print_formatted_or_exit(&instance, output_format, "instance");
}

async fn handle_instance_list(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "list",
        "Usage: dsctl instance list <schema-id>",
    );

    let schema_id: SchemaId = parse_id_or_exit(&args[1]);
    let path = instances_path(&schema_id);
    let instances = execute_or_exit(
        || client.get::<Vec<Instance>>(&path),
        &format!("Failed to list instances of schema {}", schema_id),
    )
    .await;

    cli_utils::print_formatted_or_exit(&instances, output_format, "instances");
}

async fn handle_instance_get(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        3,
        3,
        "get",
        "Usage: dsctl instance get <schema-id> <instance-id>",
    );

    let schema_id: SchemaId = parse_id_or_exit(&args[1]);
    let instance_id: InstanceId = parse_id_or_exit(&args[2]);
    let path = instance_path(&schema_id, &instance_id);
    let instance = execute_or_exit(
        || client.get::<Instance>(&path),
        &format!("Failed to get instance {}", instance_id),
    )
    .await;

    cli_utils::print_formatted_or_exit(&instance, output_format, "instance");
}

async fn handle_instance_update(
    args: &[String],
    client: &DynaschemaClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        4,
        5,
        "update",
        r#"Usage: dsctl instance update <schema-id> <instance-id> <data-json|file> [new-name]
Example: dsctl instance update <schema-id> <instance-id> '{"age":31}'"#,
    );

    let schema_id: SchemaId = parse_id_or_exit(&args[1]);
    let instance_id: InstanceId = parse_id_or_exit(&args[2]);
    let data = parse_document_or_exit(&args[3]);
    let mut body = serde_json::json!({"data": data});
    if let Some(name) = args.get(4) {
        body["name"] = serde_json::Value::String(name.clone());
    }
    let request = request_or_exit(InstanceRequest::from_body(&body, false));

    let path = instance_path(&schema_id, &instance_id);
    let instance = execute_or_exit(
        || client.put::<InstanceRequest, Instance>(&path, &request),
        &format!("Failed to update instance {}", instance_id),
    )
    .await;

    println!("Updated instance:");
    cli_utils::print_formatted_or_exit(&instance, output_format, "instance");
}

async fn handle_instance_delete(
    args: &[String],
    client: &DynaschemaClient,
    _output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        3,
        3,
        "delete",
        "Usage: dsctl instance delete <schema-id> <instance-id>",
    );

    let schema_id: SchemaId = parse_id_or_exit(&args[1]);
    let instance_id: InstanceId = parse_id_or_exit(&args[2]);
    let path = instance_path(&schema_id, &instance_id);
    let response = execute_or_exit(
        || client.delete::<MessageResponse>(&path),
        &format!("Failed to delete instance {}", instance_id),
    )
    .await;

    println!("{}", response.message);
}
