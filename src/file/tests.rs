use super::*;
use crate::builder::SofaBuilder;
use crate::layout::FlatBuffer;
use crate::schema::Violation;
use crate::store::ElementKind;
use crate::units::{CoordinateSystem, Units};
use tempfile::tempdir;

fn directivity(m: usize, n: usize) -> MemoryStore {
    SofaBuilder::new(Convention::FreeFieldDirectivityTf)
        .measurements(m)
        .samples(n)
        .build()
        .unwrap()
}

#[test]
fn test_frequency_values_in_file_order() {
    let mut file = SofaFile::from_store(directivity(2, 5));
    let freqs = [100.0, 200.0, 400.0, 800.0, 1600.0];
    file.set_frequency_values(&freqs).unwrap();
    assert_eq!(file.num_data_samples().unwrap(), 5);
    assert_eq!(file.frequency_values().unwrap(), freqs.to_vec());
    assert_eq!(file.frequency_units().unwrap(), Units::Hertz);
}

#[test]
fn test_data_real_has_mrn_shape() {
    let mut file = SofaFile::from_store(directivity(3, 4));
    let mut buf = FlatBuffer::zeros(vec![3, 1, 4]).unwrap();
    buf.set(&[2, 0, 3], 0.5);
    file.set_data_real(&buf).unwrap();
    let real = file.data_real().unwrap();
    assert_eq!(real.shape(), &[3, 1, 4]);
    assert_eq!(real.len(), 12);
    assert_eq!(real.get(&[2, 0, 3]), Some(0.5));
    assert_eq!(file.data_imag().unwrap().as_slice(), &[0.0; 12]);
}

#[test]
fn test_write_with_wrong_shape_is_rejected() {
    let mut file = SofaFile::from_store(directivity(3, 4));
    let err = file
        .set_data_imag(&FlatBuffer::zeros(vec![3, 1, 5]).unwrap())
        .unwrap_err();
    assert!(matches!(err, SofaError::ShapeMismatch(_)));
    assert!(!file.is_modified());
}

#[test]
fn test_listener_2d_access_on_3d_variable() {
    let mut store = directivity(4, 2);
    store
        .add_variable("ListenerPosition", &["I", "C", "M"], ElementKind::Double, vec![0.0; 12])
        .unwrap();
    let file = SofaFile::from_store(store);

    let err = file
        .position_values_2d(Role::Listener, PositionKind::Position)
        .unwrap_err();
    match err {
        SofaError::ShapeMismatch(m) => {
            assert_eq!(m.variable, "ListenerPosition");
            assert_eq!(
                m.mismatch,
                Mismatch::Rank {
                    expected: vec![2],
                    found: 3
                }
            );
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_receiver_rank_detection() {
    let mut store = directivity(4, 2);
    let values: Vec<f64> = (0..12).map(f64::from).collect();
    store
        .add_variable("ReceiverPosition", &["R", "C", "M"], ElementKind::Double, values.clone())
        .unwrap();
    let file = SofaFile::from_store(store);

    let buf = file
        .position_values(Role::Receiver, PositionKind::Position)
        .unwrap();
    assert_eq!(buf.shape(), &[1, 3, 4]);
    // receiver, coordinate, measurement
    assert_eq!(buf.get(&[0, 1, 2]), Some(6.0));
    assert_eq!(
        file.position_values_3d(Role::Receiver, PositionKind::Position)
            .unwrap()
            .into_vec(),
        values
    );
    assert!(matches!(
        file.position_values_2d(Role::Receiver, PositionKind::Position),
        Err(SofaError::ShapeMismatch(_))
    ));
}

#[test]
fn test_position_metadata() {
    let mut file = SofaFile::from_store(directivity(1, 1));
    assert_eq!(
        file.position(Role::Receiver, PositionKind::Position).unwrap(),
        (CoordinateSystem::Cartesian, Units::Metre)
    );
    file.set_position(
        Role::Receiver,
        PositionKind::Position,
        CoordinateSystem::Spherical,
        Units::SphericalUnits,
    )
    .unwrap();
    assert_eq!(
        file.position(Role::Receiver, PositionKind::Position).unwrap(),
        (CoordinateSystem::Spherical, Units::SphericalUnits)
    );

    let err = file
        .set_position(
            Role::Receiver,
            PositionKind::Position,
            CoordinateSystem::Cartesian,
            Units::Degree,
        )
        .unwrap_err();
    assert!(matches!(err, SofaError::InvalidAttribute { .. }));
}

#[test]
fn test_absent_orientation_is_missing_variable() {
    let file = SofaFile::from_store(directivity(1, 1));
    let err = file.position(Role::Emitter, PositionKind::Up).unwrap_err();
    assert!(matches!(err, SofaError::MissingVariable(ref v) if v == "EmitterUp"));
}

#[test]
fn test_unknown_units_attribute() {
    let mut store = directivity(1, 1);
    store
        .set_attribute(
            AttributeScope::Variable("SourcePosition"),
            "Units",
            "furlong".into(),
        )
        .unwrap();
    let file = SofaFile::from_store(store);
    let err = file.position(Role::Source, PositionKind::Position).unwrap_err();
    assert!(matches!(err, SofaError::UnknownUnit(ref u) if u.0 == "furlong"));
    assert!(!file.is_valid_convention("FreeFieldDirectivityTF"));
}

#[test]
fn test_inconsistent_axis_blocks_accessors() {
    let mut store = directivity(2, 3);
    store.add_dimension("X", 5);
    store
        .add_variable("Data.Imag", &["M", "R", "X"], ElementKind::Double, vec![0.0; 10])
        .unwrap();
    let file = SofaFile::from_store(store);
    assert!(matches!(
        file.data_real(),
        Err(SofaError::ShapeMismatch(_)) | Err(SofaError::DimensionConflict(_))
    ));
    let outcome = file.validate(Convention::FreeFieldDirectivityTf).unwrap();
    assert!(matches!(outcome.violation, Some(Violation::ShapeMismatch(_))));
}

#[test]
fn test_is_valid_convention_names() {
    let file = SofaFile::from_store(directivity(1, 1));
    assert!(file.is_valid_convention("FreeFieldDirectivityTF"));
    assert!(!file.is_valid_convention("GeneralTF"));
    assert!(!file.is_valid_convention("freefielddirectivitytf"));
    assert!(!file.is_valid_convention("NoSuchConvention"));
}

#[test]
fn test_convention_version() {
    let mut store = directivity(1, 1);
    assert_eq!(SofaFile::from_store(store.clone()).convention_version().unwrap(), "1.0");

    store.remove_attribute(AttributeScope::Global, "SOFAConventionsVersion");
    assert!(matches!(
        SofaFile::from_store(store).convention_version(),
        Err(SofaError::MissingAttribute(ref name)) if name == "SOFAConventionsVersion"
    ));
}

#[test]
fn test_open_json_snapshot_and_close_bumps_date() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("directivity.json");
    let mut store = directivity(2, 3);
    store
        .set_attribute(AttributeScope::Global, ATTR_DATE_MODIFIED, "2000-01-01 00:00:00".into())
        .unwrap();
    store.save(&path).unwrap();

    let mut file = SofaFile::open_with_config(&path, OpenConfig::append()).unwrap();
    file.set_frequency_values(&[1.0, 2.0, 3.0]).unwrap();
    file.close().unwrap();

    let reopened = SofaFile::open(&path).unwrap();
    assert_eq!(reopened.frequency_values().unwrap(), vec![1.0, 2.0, 3.0]);
    assert_ne!(
        reopened.attribute_text(ATTR_DATE_MODIFIED).unwrap(),
        "2000-01-01 00:00:00"
    );
    assert!(!reopened.is_writable());
}

#[test]
fn test_read_only_write_is_store_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ro.json");
    directivity(1, 2).save(&path).unwrap();

    let mut file = SofaFile::open(&path).unwrap();
    let err = file.set_frequency_values(&[1.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        SofaError::Store {
            source: StoreError::ReadOnly,
            ..
        }
    ));
}

#[test]
fn test_open_missing_file() {
    let err = SofaFile::open("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, SofaError::Open { .. }));
}

#[cfg(not(feature = "netcdf"))]
#[test]
fn test_netcdf_requires_feature() {
    let err = SofaFile::open("hrtf.sofa").unwrap_err();
    assert!(matches!(
        err,
        SofaError::Open {
            source: StoreError::Unsupported(_),
            ..
        }
    ));
}

#[test]
fn test_backend_detection() {
    assert_eq!(Backend::detect(Path::new("a.json")), Backend::Json);
    assert_eq!(Backend::detect(Path::new("a.JSON")), Backend::Json);
    assert_eq!(Backend::detect(Path::new("a.sofa")), Backend::Netcdf);
    assert_eq!(Backend::detect(Path::new("a")), Backend::Netcdf);
}
