use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;

use rz_client::OperationArgs;
use rz_domain::config::{Port, RawConfig};

/// razor: talk to a Razor server using the operations it advertises.
#[derive(Debug, Parser)]
#[command(name = "razor", version, about)]
pub struct Cli {
    /// Server URL, e.g. `http://razor:8150`. Overrides --hostname/--port.
    #[arg(long)]
    pub url: Option<String>,

    /// Server hostname.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Server port.
    #[arg(long)]
    pub port: Option<String>,

    /// Config file (defaults to ~/.razor_clientrc, then /etc/razor_client, then the
    /// older ~/.py_razor_clientrc and /etc/py_razor_client).
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Operation name, item segments, and `--name value` arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "OPERATION")]
    pub operation: Vec<String>,
}

impl Cli {
    /// The connection settings given on the command line.
    pub fn raw_config(&self) -> RawConfig {
        RawConfig {
            url: self.url.clone(),
            hostname: self.hostname.clone(),
            port: self.port.clone().map(Port::from),
            ..Default::default()
        }
    }
}

/// A parsed `OPERATION [SEGMENT...] [--name value ...]` tail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    /// `None` when only connection options were given.
    pub operation: Option<String>,
    pub call: OperationArgs,
}

/// Split the trailing tokens into operation, positional segments and
/// keyword arguments.
///
/// `--iso-url x` and `--iso-url=x` both yield the key `iso_url`; the
/// client's rename table maps such keys back to their wire spelling.
/// A repeated option keeps its last value.
pub fn parse_invocation(tokens: &[String]) -> anyhow::Result<Invocation> {
    let mut iter = tokens.iter().peekable();
    let mut invocation = Invocation::default();

    match iter.next() {
        None => return Ok(invocation),
        Some(op) if op.starts_with("--") => {
            anyhow::bail!("expected an operation name before {op}")
        }
        Some(op) => invocation.operation = Some(op.clone()),
    }

    while let Some(token) = iter.next() {
        let Some(opt) = token.strip_prefix("--") else {
            invocation.call.segments.push(token.clone());
            continue;
        };

        let (name, value) = match opt.split_once('=') {
            Some((name, value)) => (name, value.to_owned()),
            None => match iter.next_if(|next| !next.starts_with("--")) {
                Some(value) => (opt, value.clone()),
                None => anyhow::bail!("option --{opt} expects a value"),
            },
        };
        if name.is_empty() {
            anyhow::bail!("empty option name in {token:?}");
        }

        invocation
            .call
            .args
            .insert(option_key(name), Value::String(value));
    }

    Ok(invocation)
}

/// `new-argument` → `new_argument`.
fn option_key(name: &str) -> String {
    name.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn empty_tail_has_no_operation() {
        let inv = parse_invocation(&[]).unwrap();
        assert_eq!(inv, Invocation::default());
    }

    #[test]
    fn operation_with_segments() {
        let inv = parse_invocation(&tokens("nodes node1 log")).unwrap();
        assert_eq!(inv.operation.as_deref(), Some("nodes"));
        assert_eq!(inv.call.segments, vec!["node1", "log"]);
        assert!(inv.call.args.is_empty());
    }

    #[test]
    fn long_options_become_args() {
        let inv = parse_invocation(&tokens(
            "create_repo --name centos --iso-url http://example.com/c.iso",
        ))
        .unwrap();
        assert_eq!(inv.call.args["name"], "centos");
        assert_eq!(inv.call.args["iso_url"], "http://example.com/c.iso");
        assert!(inv.call.segments.is_empty());
    }

    #[test]
    fn equals_form() {
        let inv = parse_invocation(&tokens("reboot_node --mac=aa:bb --count=-1")).unwrap();
        assert_eq!(inv.call.args["mac"], "aa:bb");
        assert_eq!(inv.call.args["count"], "-1");
    }

    #[test]
    fn last_repeat_wins() {
        let inv = parse_invocation(&tokens("cmd --name a --name b")).unwrap();
        assert_eq!(inv.call.args["name"], "b");
    }

    #[test]
    fn option_without_value_is_error() {
        assert!(parse_invocation(&tokens("cmd --force")).is_err());
        assert!(parse_invocation(&tokens("cmd --force --name x")).is_err());
    }

    #[test]
    fn option_before_operation_is_error() {
        assert!(parse_invocation(&tokens("--name x")).is_err());
    }

    #[test]
    fn clap_collects_trailing_tokens() {
        let cli = Cli::try_parse_from([
            "razor",
            "--url",
            "http://razor:8150",
            "create_repo",
            "--name",
            "centos",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://razor:8150"));
        assert_eq!(cli.operation, tokens("create_repo --name centos"));
    }

    #[test]
    fn raw_config_from_flags() {
        let cli =
            Cli::try_parse_from(["razor", "--hostname", "razor", "--port", "8150"]).unwrap();
        let raw = cli.raw_config();
        assert_eq!(raw.hostname.as_deref(), Some("razor"));
        assert_eq!(raw.port, Some(Port::from("8150")));
        assert!(cli.operation.is_empty());
    }
}
