use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use sofa::file::{PositionKind, Role, SofaFile};
use sofa::layout::FlatBuffer;
use sofa::schema::{ATTR_DATA_TYPE, ATTR_UNITS, VAR_DATA_SAMPLING_RATE};

use super::config::DisplayConfig;

const SEPARATOR: &str =
    "_______________________________________________________________________________";

struct Printer<'a, W: Write> {
    out: &'a mut W,
    pad: usize,
}

impl<W: Write> Printer<'_, W> {
    fn line(&mut self, text: impl std::fmt::Display) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }

    fn field(&mut self, label: &str, value: impl std::fmt::Display) -> Result<()> {
        writeln!(self.out, "{:<width$} = {}", label, value, width = self.pad)?;
        Ok(())
    }

    fn values(&mut self, label: &str, values: &[f64]) -> Result<()> {
        write!(self.out, "{:<width$} = ", label, width = self.pad)?;
        self.row(values)
    }

    fn row(&mut self, values: &[f64]) -> Result<()> {
        for v in values {
            write!(self.out, "{} ", v)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

/// Print the summary of one SOFA file
///
/// Files that are not valid SOFA, or not valid for their declared convention,
/// get a one-line verdict and no further output; this is not an error.
pub fn run(file_path: &Path, display: &DisplayConfig, out: &mut impl Write) -> Result<()> {
    info!("Reading {}", file_path.display());
    let name = file_path.display().to_string();
    let file = SofaFile::open(file_path)?;
    let mut p = Printer {
        out,
        pad: display.pad_width,
    };

    let base = file.validate_base()?;
    if let Some(violation) = base.violation {
        p.line(format_args!("{} is not a valid SOFA file", name))?;
        p.line(format_args!("  {}", violation))?;
        return Ok(());
    }
    p.line(format_args!("{} is a valid SOFA file", name))?;

    p.line(SEPARATOR)?;
    for (attr, value) in file.global_attributes()?.iter() {
        p.field(attr, value)?;
    }
    p.blank()?;
    p.line(SEPARATOR)?;
    for (dim, size) in file.dimensions()?.iter() {
        p.field(dim.letter(), size)?;
    }
    p.blank()?;
    p.blank()?;

    let convention = match file.convention() {
        Ok(c) => c,
        Err(e) => {
            p.line(format_args!("{}: {}", name, e))?;
            return Ok(());
        }
    };
    if let Some(violation) = file.validate(convention)?.violation {
        p.line(format_args!("{} is not a valid '{}' file", name, convention))?;
        p.line(format_args!("  {}", violation))?;
        return Ok(());
    }
    match file.convention_version() {
        Ok(version) => p.line(format_args!(
            "{} is a valid '{}' file (version {})",
            name, convention, version
        ))?,
        Err(_) => p.line(format_args!("{} is a valid '{}' file", name, convention))?,
    }

    if display.listener {
        print_role(&mut p, &file, Role::Listener)?;
    }
    if display.source {
        print_role(&mut p, &file, Role::Source)?;
    }
    if display.receivers {
        p.blank()?;
        print_vector(&mut p, &file, Role::Receiver, PositionKind::Position)?;
    }
    if display.emitters {
        p.blank()?;
        print_vector(&mut p, &file, Role::Emitter, PositionKind::Position)?;
    }

    let fir = match file.attribute_text(ATTR_DATA_TYPE) {
        Ok(data_type) => data_type.starts_with("FIR"),
        Err(_) => convention.is_fir(),
    };
    if fir {
        print_fir(&mut p, &file, display)
    } else {
        print_tf(&mut p, &file, display)
    }
}

fn print_role<W: Write>(p: &mut Printer<'_, W>, file: &SofaFile, role: Role) -> Result<()> {
    for kind in [PositionKind::Position, PositionKind::View, PositionKind::Up] {
        if file.has_variable(role.variable(kind)) {
            p.blank()?;
            print_vector(p, file, role, kind)?;
        }
    }
    Ok(())
}

fn print_vector<W: Write>(
    p: &mut Printer<'_, W>,
    file: &SofaFile,
    role: Role,
    kind: PositionKind,
) -> Result<()> {
    let variable = role.variable(kind);
    let (coordinates, units) = file
        .position(role, kind)
        .with_context(|| format!("reading {} metadata", variable))?;
    p.field(&format!("{}:Type", variable), coordinates)?;
    p.field(&format!("{}:Units", variable), units)?;
    let values = file
        .position_values(role, kind)
        .with_context(|| format!("reading {}", variable))?;
    p.values(variable, values.as_slice())
}

fn print_cube<W: Write>(p: &mut Printer<'_, W>, label: &str, buffer: &FlatBuffer) -> Result<()> {
    let dims: Vec<String> = buffer.shape().iter().map(|d| d.to_string()).collect();
    p.line(format_args!("{}: [{}]", label, dims.join("x")))?;
    p.row(buffer.as_slice())
}

fn print_tf<W: Write>(p: &mut Printer<'_, W>, file: &SofaFile, display: &DisplayConfig) -> Result<()> {
    if display.frequencies {
        p.blank()?;
        p.line("Frequency Values (\"N\"):")?;
        p.row(&file.frequency_values()?)?;
    }
    if display.data {
        p.blank()?;
        print_cube(p, "Data.Real", &file.data_real()?)?;
        print_cube(p, "Data.Imag", &file.data_imag()?)?;
    }
    Ok(())
}

fn print_fir<W: Write>(p: &mut Printer<'_, W>, file: &SofaFile, display: &DisplayConfig) -> Result<()> {
    if display.frequencies {
        let (rate, units) = file.sampling_rate()?;
        p.blank()?;
        p.values(VAR_DATA_SAMPLING_RATE, &rate)?;
        p.field(&format!("{}:{}", VAR_DATA_SAMPLING_RATE, ATTR_UNITS), units)?;
    }
    if display.data {
        p.blank()?;
        print_cube(p, "Data.IR", &file.data_ir()?)?;
    }
    Ok(())
}

/// Supported conventions, one per line
pub fn list_conventions(out: &mut impl Write) -> Result<()> {
    for name in sofa::schema::list_supported_conventions() {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}
