//! Record lookup against small generated GRIB2 files.

use std::io::Cursor;

use chrono::{TimeZone, Utc};
use grib2_parser::Grib2File;
use test_utils::{assert_approx_eq, Grib2Builder};
use wind_common::{RecordSource, WindError, U_COMPONENT, V_COMPONENT};

fn open(bytes: Vec<u8>) -> Grib2File<Cursor<Vec<u8>>> {
    Grib2File::from_reader(Cursor::new(bytes), "synthetic").expect("Failed to index synthetic GRIB2")
}

#[test]
fn test_decodes_values_and_coordinates() {
    let values: Vec<f32> = (0..20).map(|i| i as f32 * 0.5 - 4.0).collect();
    let bytes = Grib2Builder::u_wind().with_data(values.clone()).build();

    let mut file = open(bytes);
    assert_eq!(file.messages().len(), 1);

    let record = file.find_record(U_COMPONENT).unwrap();
    assert_eq!((record.rows, record.cols), (4, 5));
    assert_eq!(record.values.len(), 20);
    for (decoded, expected) in record.values.iter().zip(&values) {
        assert_approx_eq!(*decoded, *expected, 0.01);
    }

    // Row 0 is the northern edge, columns step eastward
    assert_approx_eq!(record.lats[0], 60.0, 1e-4);
    assert_approx_eq!(record.lons[0], 0.0, 1e-4);
    assert_approx_eq!(record.lons[4], 4.0, 1e-4);
    assert_approx_eq!(record.lats[5], 59.0, 1e-4);
    assert_approx_eq!(record.lats[19], 57.0, 1e-4);
}

#[test]
fn test_level_and_valid_time() {
    let bytes = Grib2Builder::v_wind()
        .with_reference_time(2021, 3, 14, 12)
        .with_forecast(1, 6)
        .with_level(100, 50_000)
        .with_constant_value(7.5)
        .build();

    let mut file = open(bytes);
    let record = file.find_record(V_COMPONENT).unwrap();

    assert_eq!(record.level, 500.0);
    assert_eq!(
        record.valid_time,
        Utc.with_ymd_and_hms(2021, 3, 14, 18, 0, 0).unwrap()
    );
    assert!(record.values.iter().all(|v| (v - 7.5).abs() < 0.01));
}

#[test]
fn test_first_matching_record_wins() {
    let bytes = Grib2Builder::build_file(&[
        Grib2Builder::u_wind().with_level(100, 85_000).with_constant_value(1.0),
        Grib2Builder::v_wind().with_level(100, 85_000).with_constant_value(2.0),
        Grib2Builder::u_wind().with_level(100, 50_000).with_constant_value(3.0),
    ]);

    let mut file = open(bytes);
    assert_eq!(file.messages().len(), 3);

    let u = file.find_record(U_COMPONENT).unwrap();
    assert_eq!(u.level, 850.0);
    assert_approx_eq!(u.values[0], 1.0, 0.01);

    // Lookups are repeatable on the same handle
    let u_again = file.find_record("UGRD").unwrap();
    assert_eq!(u_again.level, 850.0);
}

#[test]
fn test_missing_record_is_data_not_found() {
    let bytes = Grib2Builder::u_wind().build();
    let mut file = open(bytes);

    match file.find_record(V_COMPONENT) {
        Err(WindError::DataNotFound { name }) => assert_eq!(name, V_COMPONENT),
        other => panic!("expected DataNotFound, got {other:?}"),
    }

    // Known parameter name that is not a wind component
    assert!(matches!(
        file.find_record("Temperature"),
        Err(WindError::DataNotFound { .. })
    ));
}

#[test]
fn test_bitmap_values_are_nan() {
    let mut values = vec![1.0f32; 20];
    values[3] = f32::NAN;
    values[17] = f32::NAN;
    let bytes = Grib2Builder::u_wind().with_data(values).build();

    let mut file = open(bytes);
    let record = file.find_record(U_COMPONENT).unwrap();

    assert_eq!(record.values.len(), 20);
    assert!(record.values[3].is_nan());
    assert!(record.values[17].is_nan());
    assert_eq!(record.values.iter().filter(|v| v.is_nan()).count(), 2);
}

#[test]
fn test_message_listing() {
    let bytes = Grib2Builder::build_file(&[
        Grib2Builder::u_wind(),
        Grib2Builder::v_wind().with_level(103, 10),
        Grib2Builder::new().with_parameter(0, 0),
    ]);

    let file = open(bytes);
    let messages = file.messages();

    let names: Vec<&str> = messages.iter().map(|m| m.parameter.as_str()).collect();
    assert_eq!(names, vec!["UGRD", "VGRD", "P0_0_0"]);
    assert_eq!(messages[0].level, "850 hPa");
    assert_eq!(messages[1].level, "10 m above ground");
}
