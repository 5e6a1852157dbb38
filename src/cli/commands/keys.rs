//! Key CLI commands.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::adapters::keys::KeyCodecRegistry;
use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::{KeyFields, Namespace};

#[derive(Args, Debug)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// Decode a cache key into its fields
    Parse {
        /// Cache key, e.g. alicloud:loadBalancers:acct:cn-hangzhou:web
        key: String,
    },
    /// Build a cache key from named fields
    Encode {
        /// Provider id (alicloud, huaweicloud)
        provider: String,
        /// Namespace wire name, e.g. securityGroups
        namespace: Namespace,
        /// Fields as name=value
        #[arg(value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },
    /// List the namespaces a provider's codec supports
    Namespaces {
        /// Provider id
        provider: String,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

#[derive(Debug, Serialize)]
pub struct ParsedKeyOutput {
    pub key: String,
    pub valid: bool,
    pub fields: BTreeMap<String, String>,
}

impl CommandOutput for ParsedKeyOutput {
    fn to_human(&self) -> String {
        if !self.valid {
            return format!("Key not recognised: {}", self.key);
        }
        let mut table = list_table(&["field", "value"]);
        for (name, value) in &self.fields {
            table.add_row(vec![name.as_str(), value.as_str()]);
        }
        table.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct EncodedKeyOutput {
    pub key: String,
}

impl CommandOutput for EncodedKeyOutput {
    fn to_human(&self) -> String {
        self.key.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct NamespacesOutput {
    pub provider: String,
    pub namespaces: Vec<Namespace>,
}

impl CommandOutput for NamespacesOutput {
    fn to_human(&self) -> String {
        self.namespaces
            .iter()
            .map(Namespace::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn execute(args: KeysArgs, json_mode: bool) -> Result<()> {
    let codecs = KeyCodecRegistry::with_defaults();
    match args.command {
        KeysCommands::Parse { key } => output(&parse(&codecs, key), json_mode),
        KeysCommands::Encode {
            provider,
            namespace,
            fields,
        } => output(&encode(&codecs, &provider, namespace, fields)?, json_mode),
        KeysCommands::Namespaces { provider } => {
            let codec = codecs
                .get(&provider)
                .ok_or_else(|| anyhow!("Unknown provider: {provider}"))?;
            let out = NamespacesOutput {
                provider,
                namespaces: codec.namespaces(),
            };
            output(&out, json_mode);
        }
    }
    Ok(())
}

pub fn parse(codecs: &KeyCodecRegistry, key: String) -> ParsedKeyOutput {
    let fields: BTreeMap<String, String> = codecs.parse(&key).into_iter().collect();
    ParsedKeyOutput {
        valid: !fields.is_empty(),
        key,
        fields,
    }
}

pub fn encode(
    codecs: &KeyCodecRegistry,
    provider: &str,
    namespace: Namespace,
    fields: Vec<(String, String)>,
) -> Result<EncodedKeyOutput> {
    let codec = codecs
        .get(provider)
        .ok_or_else(|| anyhow!("Unknown provider: {provider}"))?;
    let fields: KeyFields = fields.into_iter().collect();
    let key = codec
        .encode(namespace, &fields)
        .with_context(|| format!("Failed to encode {provider} {namespace} key"))?;
    Ok(EncodedKeyOutput { key })
}
