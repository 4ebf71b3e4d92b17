//! # Shared Command Utilities
//!
//! Argument validation, id parsing, and document loading used by every `dsctl` command.

use std::path::Path;
use std::str::FromStr;

use handled::Handle;
use serde_json::Value;

use crate::cli_utils;
use crate::commands::errors::{UserError, format_cli_error};

/// Parses an id, exiting with the error's message and hint on failure.
pub fn parse_id_or_exit<T, E>(id_str: &str) -> T
where
    T: FromStr<Err = E>,
    E: Handle<UserError> + std::fmt::Display,
{
    id_str
        .parse()
        .unwrap_or_else(|e: E| cli_utils::exit_with_error(&format_cli_error(&e)))
}

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments array
/// * `min_count` - The minimum number of arguments required (including subcommand)
/// * `max_count` - The maximum number of arguments allowed (including subcommand)
/// * `command` - The command name for error message
/// * `usage` - The usage string to display
pub fn validate_args_count_or_exit(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
    usage: &str,
) {
    if args.len() < min_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command requires more arguments", command),
            usage,
        );
    }
    if args.len() > max_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command has too many arguments", command),
            usage,
        );
    }
}

/// Where a document argument came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentSource {
    InlineJson,
    JsonFile,
    YamlFile,
}

fn document_source(arg: &str) -> DocumentSource {
    let path = Path::new(arg);
    if !path.is_file() {
        return DocumentSource::InlineJson;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => DocumentSource::YamlFile,
        _ => DocumentSource::JsonFile,
    }
}

/// Parses a document argument.
///
/// The argument is a path to a `.json`, `.yaml`, or `.yml` file if such a file exists, and inline
/// JSON otherwise.
pub fn parse_document(arg: &str) -> Result<Value, UserError> {
    match document_source(arg) {
        DocumentSource::InlineJson => serde_json::from_str(arg).map_err(|e| user_error(&e, arg)),
        DocumentSource::JsonFile => {
            let text = std::fs::read_to_string(arg).map_err(|e| user_error(&e, arg))?;
            serde_json::from_str(&text).map_err(|e| user_error(&e, arg))
        }
        DocumentSource::YamlFile => {
            let text = std::fs::read_to_string(arg).map_err(|e| user_error(&e, arg))?;
            serde_yml::from_str(&text).map_err(|e| user_error(&e, arg))
        }
    }
}

fn user_error<E: Handle<UserError>>(error: &E, arg: &str) -> UserError {
    error.handle().unwrap_or_else(|| UserError {
        message: format!("Could not read '{}'", arg),
        usage_hint: None,
    })
}

/// Parses a document argument or exits with an error.
pub fn parse_document_or_exit(arg: &str) -> Value {
    parse_document(arg).unwrap_or_else(|e| cli_utils::exit_with_error(&format_cli_error(&e)))
}

/// Macro to generate command dispatcher boilerplate.
macro_rules! dispatch_command {
    ($command_name:expr, $usage:expr, $args:expr, $client:expr, $output_format:expr, {
        $($subcommand:expr => $handler:expr),* $(,)?
    }) => {
        if $args.is_empty() {
            crate::cli_utils::exit_with_usage_error(
                &format!("{} command requires a subcommand", $command_name),
                $usage,
            );
        }

        match $args[0].as_str() {
            $(
                $subcommand => $handler($args, $client, $output_format).await,
            )*
            _ => {
                let available_subcommands = vec![$($subcommand),*];
                crate::cli_utils::exit_with_error(&format!(
                    "Unknown {} subcommand '{}'. Available subcommands: {}",
                    $command_name,
                    $args[0],
                    available_subcommands.join(", ")
                ));
            }
        }
    };
}

pub(crate) use dispatch_command;
