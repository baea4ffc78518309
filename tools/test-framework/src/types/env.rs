/*!
   Types for exporting test setup information into environment variables.
*/

use core::convert::AsRef;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fs::write;
use std::path::Path;

use crate::error::Error;

/**
    This trait is implemented by data types that can export the contained
    information as environment variables.

    The exported `.env` file can be `source`d in a terminal to interact
    with the networks and relayer of a test that is suspended on failure.
*/
pub trait ExportEnv {
    fn export_env(&self, writer: &mut impl EnvWriter);
}

/**
   The exported environment variables are stored in a data type that
   implements this trait. Overlapping keys are overridden.
*/
pub trait EnvWriter {
    fn write_env(&mut self, key: &str, value: &str);
}

/**
   Create an [`EnvWriter`] that adds a prefix to the keys of the exported envs.
*/
pub fn prefix_writer<'a, Writer: EnvWriter>(
    prefix: &str,
    writer: &'a mut Writer,
) -> impl EnvWriter + 'a {
    PrefixEnvWriter {
        prefix: prefix.to_string(),
        writer,
    }
}

pub struct PrefixEnvWriter<'a, Writer> {
    prefix: String,
    writer: &'a mut Writer,
}

impl EnvWriter for BTreeMap<String, String> {
    fn write_env(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

impl<'a, Writer: EnvWriter> EnvWriter for PrefixEnvWriter<'a, Writer> {
    fn write_env(&mut self, key: &str, value: &str) {
        self.writer
            .write_env(&format!("{}_{}", self.prefix, key), value);
    }
}

impl<'a, T1: ExportEnv, T2: ExportEnv> ExportEnv for (&'a T1, &'a T2) {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        self.0.export_env(writer);
        self.1.export_env(writer);
    }
}

/**
   Format the variables exported by `exporter` as `KEY=VALUE` lines.
*/
pub fn format_env(exporter: &impl ExportEnv) -> String {
    let mut envs = BTreeMap::new();
    exporter.export_env(&mut envs);

    envs.iter()
        .map(|(key, value)| format!("{key}={value}"))
        .join("\n")
}

/**
   Save the variables exported by `exporter` as a `.env` file.
*/
pub fn write_env(path: impl AsRef<Path>, exporter: &impl ExportEnv) -> Result<(), Error> {
    write(path, format_env(exporter))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node;

    impl ExportEnv for Node {
        fn export_env(&self, writer: &mut impl EnvWriter) {
            writer.write_env("CHAIN_ID", "seda-1");
            prefix_writer("REST", writer).write_env("ADDR", "http://localhost:1317");
        }
    }

    #[test]
    fn exported_envs_are_sorted_and_prefixed() {
        assert_eq!(
            format_env(&Node),
            "CHAIN_ID=seda-1\nREST_ADDR=http://localhost:1317"
        );
    }
}
