//! # SOFA File Validation
//!
//! Whole-file report for a SOFA file, covering more than a single
//! [`SofaFile::validate`] verdict.
//!
//! ## Checklist
//!
//! 1. **Open**: the file can be opened by one of the store backends
//! 2. **Base rules**: global attributes and position variables shared by every convention
//! 3. **Dimensions**: all variables agree on the sizes of M, R, E, N, I, C
//! 4. **Declared convention**: `SOFAConventions` names a supported convention, and the
//!    file conforms to it
//! 5. **Other conventions**: conformance to the remaining conventions (informational)
//! 6. **Position metadata**: every present position, view and up variable has readable
//!    `Type`/`Units` and values
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sofa::validator::validate_sofa_file;
//! use std::path::Path;
//!
//! let report = validate_sofa_file(Path::new("hrtf.sofa.json"))?;
//! println!("{}", report);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

use crate::file::{PositionKind, Role, SofaError, SofaFile};
use crate::schema::Convention;

mod report;

/// Open `path` and build its validation report
///
/// A file that cannot be opened yields a report with a failed first entry.
/// `Err` is returned only for store failures while checking an opened file.
pub fn validate_sofa_file(path: &Path) -> Result<ValidationReport> {
    let label = path.display().to_string();
    info!("Validating {}", label);
    match SofaFile::open(path) {
        Ok(file) => validate_sofa(&file, label),
        Err(e) => {
            let mut report = ValidationReport::new(label);
            report.add_check(ValidationCheck::failed("File opens", e.to_string()));
            Ok(report)
        }
    }
}

/// Build the validation report of an already opened file
pub fn validate_sofa(file: &SofaFile, label: impl Into<String>) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(label);
    report.add_check(ValidationCheck::ok("File opens"));

    let base = file.validate_base().context("checking base SOFA rules")?;
    report.add_check(match &base.violation {
        None => ValidationCheck::ok("Base SOFA rules"),
        Some(v) => ValidationCheck::failed("Base SOFA rules", v.to_string()),
    });

    check_dimensions(file, &mut report);
    let declared = check_declared_convention(file, &mut report)?;
    check_other_conventions(file, declared, &mut report)?;
    check_positions(file, &mut report);
    Ok(report)
}

fn check_dimensions(file: &SofaFile, report: &mut ValidationReport) {
    const NAME: &str = "Dimensions consistent";
    match file.dimensions() {
        Ok(dims) => {
            let sizes: Vec<String> = dims.iter().map(|(d, s)| format!("{}={}", d, s)).collect();
            if sizes.is_empty() {
                report.add_check(ValidationCheck::warning(NAME, "no dimension resolved"));
            } else {
                report.add_check(ValidationCheck::ok(format!("{} ({})", NAME, sizes.join(", "))));
            }
        }
        Err(e) => report.add_check(ValidationCheck::failed(NAME, e.to_string())),
    }
}

fn check_declared_convention(
    file: &SofaFile,
    report: &mut ValidationReport,
) -> Result<Option<Convention>> {
    const NAME: &str = "Declared convention";
    let convention = match file.convention() {
        Ok(c) => c,
        Err(SofaError::UnknownConvention(e)) => {
            report.add_check(ValidationCheck::warning(NAME, e.to_string()));
            return Ok(None);
        }
        Err(e @ SofaError::MissingAttribute(_)) => {
            report.add_check(ValidationCheck::failed(NAME, e.to_string()));
            return Ok(None);
        }
        Err(e) => return Err(e).context("reading SOFAConventions"),
    };

    let outcome = file
        .validate(convention)
        .with_context(|| format!("checking {}", convention))?;
    let name = format!("{} conformance", convention);
    report.add_check(match outcome.violation {
        None => ValidationCheck::ok(name),
        Some(v) => ValidationCheck::failed(name, v.to_string()),
    });
    Ok(Some(convention))
}

fn check_other_conventions(
    file: &SofaFile,
    declared: Option<Convention>,
    report: &mut ValidationReport,
) -> Result<()> {
    for convention in Convention::ALL.into_iter().filter(|c| Some(*c) != declared) {
        let outcome = file
            .validate(convention)
            .with_context(|| format!("checking {}", convention))?;
        let name = format!("{} conformance", convention);
        report.add_check(match outcome.violation {
            None => ValidationCheck::ok(name),
            Some(v) => ValidationCheck::info(name, v.to_string()),
        });
    }
    Ok(())
}

fn check_positions(file: &SofaFile, report: &mut ValidationReport) {
    for role in Role::ALL {
        for kind in [PositionKind::Position, PositionKind::View, PositionKind::Up] {
            let variable = role.variable(kind);
            if !file.has_variable(variable) {
                continue;
            }
            let result = file
                .position(role, kind)
                .and_then(|meta| file.position_values(role, kind).map(|buf| (meta, buf)));
            let name = format!("{} readable", variable);
            report.add_check(match result {
                Ok(((coordinates, units), buf)) => ValidationCheck::info(
                    name,
                    format!("{} {:?}, {}", coordinates, buf.shape(), units),
                ),
                Err(e) if kind == PositionKind::Position => ValidationCheck::failed(name, e.to_string()),
                Err(e) => ValidationCheck::warning(name, e.to_string()),
            });
        }
    }
}
