use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use dynaschema::{
    cli_utils::{self, OutputFormat},
    commands::{handle_instance_command, handle_schema_command},
    http_utils,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the dynaschema API server")]
    base_url: String,
    #[arrrg(
        optional,
        "Output format for printed records: json or yaml (default: json)"
    )]
    output: OutputFormat,
}

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const USAGE: &str = r#"Usage: dsctl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the dynaschema API server (default: http://localhost:5000)
  --output <format>    Output format for printed records: json or yaml (default: json)

Documents may be given inline as JSON or as a path to a .json, .yaml or .yml file.

Commands:
  schema create <name> <attributes>                         Create a schema
  schema list                                               List all schemas
  schema get <schema-id>                                    Get a schema by ID
  schema update <schema-id> <request>                       Update a schema's name and/or attributes
  schema delete <schema-id>                                 Delete a schema and its instances
  schema validate <attributes>                              Check attributes locally without a server
  instance create <schema-id> <name> <data>                 Create an instance of a schema
  instance list <schema-id>                                 List the instances of a schema
  instance get <schema-id> <instance-id>                    Get an instance by ID
  instance update <schema-id> <instance-id> <data> [name]   Replace an instance's data
  instance delete <schema-id> <instance-id>                 Delete an instance"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) = Options::from_command_line_relaxed("USAGE: dsctl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let base_url = if options.base_url.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        options.base_url
    };

    let client = http_utils::DynaschemaClient::new(base_url);

    match free[0].as_str() {
        "schema" => {
            handle_schema_command(&free[1..], &client, options.output).await;
        }
        "instance" => {
            handle_instance_command(&free[1..], &client, options.output).await;
        }
        "help" => {
            println!("{}", USAGE);
        }
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: schema, instance",
                free[0]
            ));
        }
    }

    Ok(())
}
