//! Entrypoint and bundle writers.
//!
//! The entrypoint is the one script a wiki user adds to their common.js. It
//! comes in two shapes:
//!
//! ```text
//! Reference                                Self-contained
//! ---------                                --------------
//! mw.loader.load(".../mediawiki/...");     {
//! mw.loader.load(".../gadgets/a/...");     function loadLazily (scriptUrl) {...}
//! mw.loader.load(".../gadgets/b/...");     <payload: interface code>
//!                                          <payload: a>
//!                                          <payload: b>
//!                                          }
//! ```
//!
//! Reference entrypoints point at rolled-up `gadget-impl.js` files written by
//! [`write_unit_bundles`]. Self-contained entrypoints carry every payload
//! themselves.
//!
//! Payloads are compiled one unit at a time and written before the next one
//! is compiled. A unit that fails with a per-unit error is reported and
//! skipped; transform and I/O failures abort.

use crate::naming::unit_prefix;
use crate::payload::{PayloadCompiler, PayloadError};
use crate::types::{BuildUnit, UnitId};
use crate::urls::{StaticUrls, UNIT_BUNDLE_FILE};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Opening of a self-contained entrypoint, including the ES5 helper lazy
/// registrations call to fetch and run a script.
pub const SELF_CONTAINED_PREAMBLE: &str = "{\n\nfunction loadLazily (scriptUrl) {\n\tfetch(scriptUrl)\n\t\t.then(function (res) { return res.text(); })\n\t\t.then(function (contents) { $.globalEval(\"(function () {\" + contents + \"})()\"); })\n\t\t.catch(console.error);\n}\n\n";

pub const SELF_CONTAINED_CLOSE: &str = "}";

const PAYLOAD_SEPARATOR: &str = "\n\n";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Payload(#[from] PayloadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// One `mw.loader.load` statement per rolled-up bundle.
    Reference,
    /// Every payload inline, compiled with the compiler's strategy.
    SelfContained,
}

/// Progress of a single unit.
#[derive(Debug)]
pub enum EmitEvent {
    Written { id: UnitId },
    Skipped { id: UnitId, reason: PayloadError },
}

/// Outcome of an emission run.
#[derive(Debug, Default)]
pub struct EmitReport {
    pub written: Vec<UnitId>,
    /// Skipped units with the reason, rendered.
    pub skipped: Vec<(UnitId, String)>,
}

impl EmitReport {
    fn record(&mut self, event: &EmitEvent) {
        match event {
            EmitEvent::Written { id } => self.written.push(id.clone()),
            EmitEvent::Skipped { id, reason } => {
                self.skipped.push((id.clone(), reason.to_string()))
            }
        }
    }
}

/// Write one `mw.loader.load` per bundle: the interface bundle first when
/// there is interface code, then every unit in order.
pub fn emit_reference<W: Write>(
    out: &mut W,
    units: &[BuildUnit],
    interface: &[BuildUnit],
    urls: &StaticUrls,
) -> Result<EmitReport, EmitError> {
    let mut report = EmitReport::default();
    // All interface units share a single bundle.
    for unit in interface.iter().take(1).chain(units) {
        writeln!(
            out,
            "mw.loader.load({});",
            crate::js::string_literal(&urls.unit_bundle_url(unit))
        )?;
        report.record(&EmitEvent::Written { id: unit.id() });
    }
    Ok(report)
}

/// Write a self-contained entrypoint: interface payloads, then unit payloads.
pub fn emit_self_contained<W: Write>(
    out: &mut W,
    units: &[BuildUnit],
    interface: &[BuildUnit],
    compiler: &mut PayloadCompiler,
    mut on_event: impl FnMut(&EmitEvent),
) -> Result<EmitReport, EmitError> {
    let mut report = EmitReport::default();
    out.write_all(SELF_CONTAINED_PREAMBLE.as_bytes())?;

    let payloads = interface
        .iter()
        .chain(units)
        .map(|unit| (unit, compile_unit(compiler, unit)));
    for (unit, payload) in payloads {
        let event = match payload? {
            Ok(code) => {
                out.write_all(code.as_bytes())?;
                out.write_all(PAYLOAD_SEPARATOR.as_bytes())?;
                EmitEvent::Written { id: unit.id() }
            }
            Err(reason) => EmitEvent::Skipped {
                id: unit.id(),
                reason,
            },
        };
        on_event(&event);
        report.record(&event);
    }

    out.write_all(SELF_CONTAINED_CLOSE.as_bytes())?;
    Ok(report)
}

/// Create (or truncate) the entrypoint at `path` and write it.
///
/// The file is closed on every path; on error its content is incomplete.
pub fn write_entrypoint(
    path: &Path,
    units: &[BuildUnit],
    interface: &[BuildUnit],
    mode: EmitMode,
    compiler: &mut PayloadCompiler,
    on_event: impl FnMut(&EmitEvent),
) -> Result<EmitReport, EmitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    let report = match mode {
        EmitMode::Reference => emit_reference(&mut out, units, interface, compiler.urls())?,
        EmitMode::SelfContained => {
            emit_self_contained(&mut out, units, interface, compiler, on_event)?
        }
    };
    out.flush()?;
    Ok(report)
}

/// Where a unit's rolled-up bundle lives under `dist`.
pub fn unit_bundle_path(dist: &Path, unit: &BuildUnit) -> PathBuf {
    dist.join(unit_prefix(unit)).join(UNIT_BUNDLE_FILE)
}

/// Compile every unit into its own `gadget-impl.js` under `dist`.
///
/// Interface units share `dist/mediawiki/gadget-impl.js`, which is only
/// written when at least one of them compiles.
pub fn write_unit_bundles(
    dist: &Path,
    units: &[BuildUnit],
    interface: &[BuildUnit],
    compiler: &mut PayloadCompiler,
    mut on_event: impl FnMut(&EmitEvent),
) -> Result<EmitReport, EmitError> {
    let mut report = EmitReport::default();

    let mut interface_code = Vec::new();
    for unit in interface {
        let event = match compile_unit(compiler, unit)? {
            Ok(code) => {
                interface_code.push(code);
                EmitEvent::Written { id: unit.id() }
            }
            Err(reason) => EmitEvent::Skipped {
                id: unit.id(),
                reason,
            },
        };
        on_event(&event);
        report.record(&event);
    }
    if let Some(first) = interface.first().filter(|_| !interface_code.is_empty()) {
        write_file(
            &unit_bundle_path(dist, first),
            &interface_code.join(PAYLOAD_SEPARATOR),
        )?;
    }

    for unit in units {
        let event = match compile_unit(compiler, unit)? {
            Ok(code) => {
                write_file(&unit_bundle_path(dist, unit), &code)?;
                EmitEvent::Written { id: unit.id() }
            }
            Err(reason) => EmitEvent::Skipped {
                id: unit.id(),
                reason,
            },
        };
        on_event(&event);
        report.record(&event);
    }

    Ok(report)
}

fn write_file(path: &Path, contents: &str) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Compile one unit, lifting fatal failures out of the per-unit result.
fn compile_unit(
    compiler: &mut PayloadCompiler,
    unit: &BuildUnit,
) -> Result<Result<String, PayloadError>, EmitError> {
    match compiler.compile(unit) {
        Err(err) if err.is_fatal() => Err(err.into()),
        other => Ok(other),
    }
}
