use super::constants::*;
use super::{ConventionSchema, ExtraCheck, VariableMetadata, VariableSpec};
use crate::dimensions::Dim::{self, C, E, I, M, N, R};
use crate::store::ElementKind;
use crate::units::{CoordinateSystem, Units};

const SINGLE: &[&[Dim]] = &[&[I, C], &[M, C]];
const RECEIVERS: &[&[Dim]] = &[&[R, C], &[R, C, I], &[R, C, M]];
const EMITTERS: &[&[Dim]] = &[&[E, C], &[E, C, I], &[E, C, M]];
const MRN: &[&[Dim]] = &[&[M, R, N]];

const CARTESIAN: (CoordinateSystem, Units) = (CoordinateSystem::Cartesian, Units::Metre);
const SPHERICAL: (CoordinateSystem, Units) = (CoordinateSystem::Spherical, Units::SphericalUnits);

const fn position(
    name: &'static str,
    signatures: &'static [&'static [Dim]],
    required: bool,
    default: (CoordinateSystem, Units),
) -> VariableSpec {
    VariableSpec {
        name,
        signatures,
        element: ElementKind::Double,
        required,
        metadata: VariableMetadata::Position { default },
    }
}

const fn data(name: &'static str, signatures: &'static [&'static [Dim]]) -> VariableSpec {
    VariableSpec {
        name,
        signatures,
        element: ElementKind::Double,
        required: true,
        metadata: VariableMetadata::None,
    }
}

const LISTENER_POSITION: VariableSpec = position(VAR_LISTENER_POSITION, SINGLE, true, CARTESIAN);
const LISTENER_VIEW: VariableSpec = position(VAR_LISTENER_VIEW, SINGLE, false, CARTESIAN);
const LISTENER_VIEW_REQUIRED: VariableSpec = position(VAR_LISTENER_VIEW, SINGLE, true, CARTESIAN);
const LISTENER_UP: VariableSpec = position(VAR_LISTENER_UP, SINGLE, false, CARTESIAN);
const SOURCE_POSITION: VariableSpec = position(VAR_SOURCE_POSITION, SINGLE, true, CARTESIAN);
const SOURCE_POSITION_SPHERICAL: VariableSpec =
    position(VAR_SOURCE_POSITION, SINGLE, true, SPHERICAL);
const SOURCE_VIEW: VariableSpec = position(VAR_SOURCE_VIEW, SINGLE, false, CARTESIAN);
const SOURCE_UP: VariableSpec = position(VAR_SOURCE_UP, SINGLE, false, CARTESIAN);
const RECEIVER_POSITION: VariableSpec = position(VAR_RECEIVER_POSITION, RECEIVERS, true, CARTESIAN);
const RECEIVER_VIEW: VariableSpec = position(VAR_RECEIVER_VIEW, RECEIVERS, false, CARTESIAN);
const RECEIVER_UP: VariableSpec = position(VAR_RECEIVER_UP, RECEIVERS, false, CARTESIAN);
const EMITTER_POSITION: VariableSpec = position(VAR_EMITTER_POSITION, EMITTERS, true, CARTESIAN);
const EMITTER_VIEW: VariableSpec = position(VAR_EMITTER_VIEW, EMITTERS, false, CARTESIAN);
const EMITTER_UP: VariableSpec = position(VAR_EMITTER_UP, EMITTERS, false, CARTESIAN);

const DATA_IR: VariableSpec = data(VAR_DATA_IR, MRN);
const DATA_SAMPLING_RATE: VariableSpec = VariableSpec {
    metadata: VariableMetadata::Units(Units::Hertz),
    ..data(VAR_DATA_SAMPLING_RATE, &[&[I], &[M]])
};
const DATA_DELAY: VariableSpec = data(VAR_DATA_DELAY, &[&[I, R], &[M, R]]);
const DATA_REAL: VariableSpec = data(VAR_DATA_REAL, MRN);
const DATA_IMAG: VariableSpec = data(VAR_DATA_IMAG, MRN);
const FREQUENCY: VariableSpec = VariableSpec {
    metadata: VariableMetadata::Units(Units::Hertz),
    ..data(VAR_FREQUENCY, &[&[N]])
};

/// Generic rules every SOFA file must satisfy, whatever its convention
pub static BASE_SCHEMA: ConventionSchema = ConventionSchema {
    name: None,
    version: "",
    data_type: None,
    room_type: None,
    variables: &[
        LISTENER_POSITION,
        LISTENER_VIEW,
        LISTENER_UP,
        SOURCE_POSITION,
        SOURCE_VIEW,
        SOURCE_UP,
        RECEIVER_POSITION,
        RECEIVER_VIEW,
        RECEIVER_UP,
        EMITTER_POSITION,
        EMITTER_VIEW,
        EMITTER_UP,
    ],
    extra: &[],
};

pub(super) static GENERAL_FIR: ConventionSchema = ConventionSchema {
    name: Some("GeneralFIR"),
    version: "1.0",
    data_type: Some("FIR"),
    room_type: None,
    variables: &[
        LISTENER_POSITION,
        LISTENER_VIEW,
        LISTENER_UP,
        SOURCE_POSITION,
        SOURCE_VIEW,
        SOURCE_UP,
        RECEIVER_POSITION,
        RECEIVER_VIEW,
        RECEIVER_UP,
        EMITTER_POSITION,
        EMITTER_VIEW,
        EMITTER_UP,
        DATA_IR,
        DATA_SAMPLING_RATE,
        DATA_DELAY,
    ],
    extra: &[],
};

pub(super) static GENERAL_TF: ConventionSchema = ConventionSchema {
    name: Some("GeneralTF"),
    version: "1.0",
    data_type: Some("TF"),
    room_type: None,
    variables: &[
        LISTENER_POSITION,
        LISTENER_VIEW,
        LISTENER_UP,
        SOURCE_POSITION,
        SOURCE_VIEW,
        SOURCE_UP,
        RECEIVER_POSITION,
        RECEIVER_VIEW,
        RECEIVER_UP,
        EMITTER_POSITION,
        EMITTER_VIEW,
        EMITTER_UP,
        FREQUENCY,
        DATA_REAL,
        DATA_IMAG,
    ],
    extra: &[],
};

pub(super) static SIMPLE_FREE_FIELD_HRIR: ConventionSchema = ConventionSchema {
    name: Some("SimpleFreeFieldHRIR"),
    version: "1.0",
    data_type: Some("FIR"),
    room_type: Some(FREE_FIELD),
    variables: &[
        LISTENER_POSITION,
        LISTENER_VIEW_REQUIRED,
        LISTENER_UP,
        SOURCE_POSITION_SPHERICAL,
        SOURCE_VIEW,
        SOURCE_UP,
        RECEIVER_POSITION,
        RECEIVER_VIEW,
        RECEIVER_UP,
        EMITTER_POSITION,
        EMITTER_VIEW,
        EMITTER_UP,
        DATA_IR,
        DATA_SAMPLING_RATE,
        DATA_DELAY,
    ],
    extra: &[ExtraCheck::DimensionEquals(R, 2), ExtraCheck::DimensionEquals(E, 1)],
};

pub(super) static SIMPLE_FREE_FIELD_TF: ConventionSchema = ConventionSchema {
    name: Some("SimpleFreeFieldTF"),
    version: "1.0",
    data_type: Some("TF"),
    room_type: Some(FREE_FIELD),
    variables: &[
        LISTENER_POSITION,
        LISTENER_VIEW_REQUIRED,
        LISTENER_UP,
        SOURCE_POSITION_SPHERICAL,
        SOURCE_VIEW,
        SOURCE_UP,
        RECEIVER_POSITION,
        RECEIVER_VIEW,
        RECEIVER_UP,
        EMITTER_POSITION,
        EMITTER_VIEW,
        EMITTER_UP,
        FREQUENCY,
        DATA_REAL,
        DATA_IMAG,
    ],
    extra: &[ExtraCheck::DimensionEquals(R, 2), ExtraCheck::DimensionEquals(E, 1)],
};

pub(super) static FREE_FIELD_DIRECTIVITY_TF: ConventionSchema = ConventionSchema {
    name: Some("FreeFieldDirectivityTF"),
    version: "1.0",
    data_type: Some("TF"),
    room_type: Some(FREE_FIELD),
    variables: &[
        LISTENER_POSITION,
        LISTENER_VIEW_REQUIRED,
        LISTENER_UP,
        SOURCE_POSITION,
        SOURCE_VIEW,
        SOURCE_UP,
        RECEIVER_POSITION,
        RECEIVER_VIEW,
        RECEIVER_UP,
        EMITTER_POSITION,
        EMITTER_VIEW,
        EMITTER_UP,
        FREQUENCY,
        DATA_REAL,
        DATA_IMAG,
    ],
    extra: &[ExtraCheck::SameShape(VAR_DATA_REAL, VAR_DATA_IMAG)],
};
