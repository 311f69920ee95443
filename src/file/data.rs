use super::{SofaError, SofaFile};
use crate::dimensions::Dim;
use crate::layout::{FlatBuffer, ShapeMismatch};
use crate::schema::{
    ATTR_UNITS, VAR_DATA_DELAY, VAR_DATA_IMAG, VAR_DATA_IR, VAR_DATA_REAL,
    VAR_DATA_SAMPLING_RATE, VAR_FREQUENCY,
};
use crate::units::Units;

impl SofaFile {
    /// Number of measurements (M)
    pub fn num_measurements(&self) -> Result<usize, SofaError> {
        self.dimension(Dim::M)
    }

    /// Number of receivers (R)
    pub fn num_receivers(&self) -> Result<usize, SofaError> {
        self.dimension(Dim::R)
    }

    /// Number of emitters (E)
    pub fn num_emitters(&self) -> Result<usize, SofaError> {
        self.dimension(Dim::E)
    }

    /// Number of data samples or frequency bins (N)
    pub fn num_data_samples(&self) -> Result<usize, SofaError> {
        self.dimension(Dim::N)
    }

    fn mrn_shape(&self) -> Result<Vec<usize>, SofaError> {
        Ok(vec![
            self.num_measurements()?,
            self.num_receivers()?,
            self.num_data_samples()?,
        ])
    }

    /// Frequency axis of a transfer-function file, `N` values in file order
    pub fn frequency_values(&self) -> Result<Vec<f64>, SofaError> {
        let n = self.num_data_samples()?;
        Ok(self.read_buffer(VAR_FREQUENCY, vec![n])?.into_vec())
    }

    /// Units of the frequency axis
    pub fn frequency_units(&self) -> Result<Units, SofaError> {
        Ok(Units::from_name(
            &self.variable_attribute_text(VAR_FREQUENCY, ATTR_UNITS)?,
        )?)
    }

    /// Real part of the transfer functions, shaped `[M, R, N]`
    pub fn data_real(&self) -> Result<FlatBuffer, SofaError> {
        self.read_buffer(VAR_DATA_REAL, self.mrn_shape()?)
    }

    /// Imaginary part of the transfer functions, shaped `[M, R, N]`
    pub fn data_imag(&self) -> Result<FlatBuffer, SofaError> {
        self.read_buffer(VAR_DATA_IMAG, self.mrn_shape()?)
    }

    /// Impulse responses, shaped `[M, R, N]`
    pub fn data_ir(&self) -> Result<FlatBuffer, SofaError> {
        self.read_buffer(VAR_DATA_IR, self.mrn_shape()?)
    }

    /// Sampling rate (one value, or one per measurement) and its units
    pub fn sampling_rate(&self) -> Result<(Vec<f64>, Units), SofaError> {
        self.dimensions()?;
        let shape = self.shape_of(VAR_DATA_SAMPLING_RATE)?;
        let values = self.read_buffer(VAR_DATA_SAMPLING_RATE, shape)?.into_vec();
        let units = Units::from_name(
            &self.variable_attribute_text(VAR_DATA_SAMPLING_RATE, ATTR_UNITS)?,
        )?;
        Ok((values, units))
    }

    /// Broadband delays, shaped `[I, R]` or `[M, R]`
    pub fn data_delay(&self) -> Result<FlatBuffer, SofaError> {
        self.dimensions()?;
        let shape = self.shape_of(VAR_DATA_DELAY)?;
        self.read_buffer(VAR_DATA_DELAY, shape)
    }

    /// Overwrite the frequency axis; exactly `N` values
    pub fn set_frequency_values(&mut self, values: &[f64]) -> Result<(), SofaError> {
        let buffer = FlatBuffer::from_shape_vec(vec![values.len()], values.to_vec())
            .map_err(|m| ShapeMismatch::new(VAR_FREQUENCY, m))?;
        self.write_buffer(VAR_FREQUENCY, &buffer)
    }

    /// Overwrite the sampling rate; one value or one per measurement, as stored
    pub fn set_sampling_rate(&mut self, values: &[f64]) -> Result<(), SofaError> {
        let buffer = FlatBuffer::from_shape_vec(vec![values.len()], values.to_vec())
            .map_err(|m| ShapeMismatch::new(VAR_DATA_SAMPLING_RATE, m))?;
        self.write_buffer(VAR_DATA_SAMPLING_RATE, &buffer)
    }

    /// Overwrite the real part; shape must be `[M, R, N]`
    pub fn set_data_real(&mut self, values: &FlatBuffer) -> Result<(), SofaError> {
        self.write_buffer(VAR_DATA_REAL, values)
    }

    /// Overwrite the imaginary part; shape must be `[M, R, N]`
    pub fn set_data_imag(&mut self, values: &FlatBuffer) -> Result<(), SofaError> {
        self.write_buffer(VAR_DATA_IMAG, values)
    }

    /// Overwrite the impulse responses; shape must be `[M, R, N]`
    pub fn set_data_ir(&mut self, values: &FlatBuffer) -> Result<(), SofaError> {
        self.write_buffer(VAR_DATA_IR, values)
    }

    /// Overwrite the broadband delays; shape must match the stored one
    pub fn set_data_delay(&mut self, values: &FlatBuffer) -> Result<(), SofaError> {
        self.write_buffer(VAR_DATA_DELAY, values)
    }
}
