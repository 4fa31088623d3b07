use nc_histogram::config::HistogramConfig;
use nc_histogram::data_source::DataReader;
use nc_histogram::errors::HistogramError;
use nc_histogram::netcdf_io::NetCDFReader;
use nc_histogram::processing::{process_file, SkipReason, VariableOutcome};
use nc_histogram::report::parse_histogram_rows;
use ndarray::{Array1, Array2, Array3};
use netcdf::create;
use std::path::Path;
use tempfile::tempdir;

/// Writes a small EOS-06 style file:
/// - `time`, `lat`, `lon` coordinate variables
/// - `temperature(time, lat, lon)` with one NaN and one `_FillValue` sample
/// - `humidity(lat, lon)` made only of fill values
fn create_sample_file(path: &Path) {
    let mut file = create(path).expect("Failed to create NetCDF file");

    file.add_attribute("title", "Test Satellite Data")
        .expect("Failed to add title");

    file.add_dimension("time", 2).expect("Failed to add dimension time");
    file.add_dimension("lat", 3).expect("Failed to add dimension lat");
    file.add_dimension("lon", 2).expect("Failed to add dimension lon");

    {
        let mut time = file
            .add_variable::<f64>("time", &["time"])
            .expect("Failed to add time");
        time.put(Array1::from(vec![0.0, 30.0]).view(), ..)
            .expect("Failed to write time");
    }
    {
        let mut lat = file
            .add_variable::<f32>("lat", &["lat"])
            .expect("Failed to add lat");
        lat.put(Array1::from(vec![-10.0f32, 0.0, 10.0]).view(), ..)
            .expect("Failed to write lat");
    }
    {
        let mut lon = file
            .add_variable::<f32>("lon", &["lon"])
            .expect("Failed to add lon");
        lon.put(Array1::from(vec![100.0f32, 110.0]).view(), ..)
            .expect("Failed to write lon");
    }

    {
        let mut temp = file
            .add_variable::<f32>("temperature", &["time", "lat", "lon"])
            .expect("Failed to add temperature");
        temp.put_attribute("units", "K").expect("Failed to add units");
        temp.put_attribute("_FillValue", -999.0f32)
            .expect("Failed to add _FillValue");

        let data: Vec<f32> = vec![
            1.0, 2.0, // time=0, lat=0
            3.0, f32::NAN, // time=0, lat=1
            5.0, 6.0, // time=0, lat=2
            7.0, -999.0, // time=1, lat=0
            9.0, 10.0, // time=1, lat=1
            11.0, 12.0, // time=1, lat=2
        ];
        let array = Array3::from_shape_vec((2, 3, 2), data).expect("Failed to shape temperature");
        temp.put(array.view(), ..).expect("Failed to write temperature");
    }

    {
        let mut humidity = file
            .add_variable::<f32>("humidity", &["lat", "lon"])
            .expect("Failed to add humidity");
        humidity
            .put_attribute("_FillValue", -999.0f32)
            .expect("Failed to add _FillValue");
        let array = Array2::from_elem((3, 2), -999.0f32);
        humidity.put(array.view(), ..).expect("Failed to write humidity");
    }
}

/// Writes `counts(y, x)` as int16 packed with `scale_factor`/`add_offset`,
/// a `_FillValue` and a `valid_range`.
fn create_packed_file(path: &Path) {
    let mut file = create(path).expect("Failed to create NetCDF file");
    file.add_dimension("y", 2).expect("Failed to add dimension y");
    file.add_dimension("x", 3).expect("Failed to add dimension x");

    let mut counts = file
        .add_variable::<i16>("counts", &["y", "x"])
        .expect("Failed to add counts");
    counts
        .put_attribute("_FillValue", -1i16)
        .expect("Failed to add _FillValue");
    counts
        .put_attribute("scale_factor", 0.5f32)
        .expect("Failed to add scale_factor");
    counts
        .put_attribute("add_offset", 10.0f32)
        .expect("Failed to add add_offset");
    counts
        .put_attribute("valid_range", vec![0i16, 100])
        .expect("Failed to add valid_range");

    let array = Array2::from_shape_vec((2, 3), vec![0i16, 4, -1, 200, 20, 8])
        .expect("Failed to shape counts");
    counts.put(array.view(), ..).expect("Failed to write counts");
}

#[test]
fn test_packed_int16_is_unpacked_on_read() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input = temp_dir.path().join("packed.nc");
    create_packed_file(&input);

    let reader = NetCDFReader::open(&input, true).expect("Failed to open packed file");
    let meta = reader.get_metadata("counts").expect("Failed to read metadata");
    assert_eq!(meta.dtype, "int16");
    assert_eq!(meta.shape, vec![2, 3]);

    let values = reader.read_flat("counts").expect("Failed to read counts");
    assert_eq!(values.len(), 6);
    assert_eq!(values[0], 10.0);
    assert_eq!(values[1], 12.0);
    assert!(values[2].is_nan(), "fill value should be masked");
    assert!(values[3].is_nan(), "out-of-range value should be masked");
    assert_eq!(values[4], 20.0);
    assert_eq!(values[5], 14.0);

    let raw = NetCDFReader::open(&input, false)
        .expect("Failed to open packed file")
        .read_flat("counts")
        .expect("Failed to read counts");
    assert_eq!(raw, vec![0.0, 4.0, -1.0, 200.0, 20.0, 8.0]);

    let out_dir = temp_dir.path().join("out");
    let summary = process_file(&HistogramConfig::new(&input).with_output_dir(&out_dir).with_bins(2))
        .expect("Run should succeed");
    assert_eq!(summary.processed_count(), 1);
    let text = std::fs::read_to_string(out_dir.join("packed_counts_histogram.txt"))
        .expect("Report should exist");
    assert!(text.contains("#   Count: 4
"));
    assert!(text.contains("#   Min: 10.000000
"));
    assert!(text.contains("#   Max: 20.000000
"));
}

#[test]
fn test_end_to_end_histogram_reports() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input = temp_dir.path().join("eos06.nc");
    create_sample_file(&input);

    let out_dir = temp_dir.path().join("histograms");
    let config = HistogramConfig::new(&input)
        .with_output_dir(&out_dir)
        .with_bins(5);

    let summary = process_file(&config).expect("Run should succeed");

    assert_eq!(summary.processed_count(), 1);
    assert_eq!(summary.failed_count(), 0);
    for coord in ["time", "lat", "lon"] {
        assert!(matches!(
            summary.outcome(coord),
            Some(VariableOutcome::Skipped(SkipReason::CoordinateVariable))
        ));
    }
    assert!(matches!(
        summary.outcome("humidity"),
        Some(VariableOutcome::Skipped(SkipReason::EmptyData))
    ));

    let report_path = out_dir.join("eos06_temperature_histogram.txt");
    let text = std::fs::read_to_string(&report_path).expect("Report should exist");

    assert!(text.starts_with("# Histogram for variable: temperature\n# Generated on: "));
    assert!(text.contains("# Variable info:\n#   units: K\n#   _FillValue: -999.0\n"));
    assert!(text.contains("#   shape: (2, 3, 2)\n"));
    assert!(text.contains("#   dtype: float32\n"));
    assert!(text.contains("#   dimensions: ('time', 'lat', 'lon')\n"));
    assert!(text.contains("#   Count: 10\n"));
    assert!(text.contains("#   Mean: 6.600000\n"));
    assert!(text.contains("#   Min: 1.000000\n"));
    assert!(text.contains("#   Max: 12.000000\n"));
    assert!(text.contains("#   Median: 6.500000\n"));

    let rows = parse_histogram_rows(&text).expect("Data section should parse");
    let counts: Vec<u64> = rows.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![3, 1, 2, 1, 3]);
    assert!((rows[0].left - 1.0).abs() < 1e-6);
    assert!((rows[1].left - 3.2).abs() < 1e-6);
    assert!((rows[4].right - 12.0).abs() < 1e-6);

    assert!(!out_dir.join("eos06_humidity_histogram.txt").exists());
}

#[test]
fn test_raw_values_without_masking() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input = temp_dir.path().join("raw.nc");
    create_sample_file(&input);

    let config = HistogramConfig::new(&input)
        .with_variables(["temperature", "humidity"])
        .with_fill_value_masking(false);

    let summary = process_file(&config).expect("Run should succeed");
    assert_eq!(summary.processed_count(), 2);

    // Reports land next to the input when no output directory is given
    let text = std::fs::read_to_string(temp_dir.path().join("raw_temperature_histogram.txt"))
        .expect("Report should exist");
    assert!(text.contains("#   Count: 11\n"));
    assert!(text.contains("#   Min: -999.000000\n"));

    let humidity = std::fs::read_to_string(temp_dir.path().join("raw_humidity_histogram.txt"))
        .expect("Report should exist");
    let rows = parse_histogram_rows(&humidity).expect("Data section should parse");
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[0].count, 6);
    assert!(rows[1..].iter().all(|r| r.count == 0));
}

#[test]
fn test_missing_source_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config = HistogramConfig::new(temp_dir.path().join("does_not_exist.nc"));

    match process_file(&config) {
        Err(e @ HistogramError::SourceOpenFailure { .. }) => assert!(e.is_run_fatal()),
        other => panic!("Expected SourceOpenFailure, got {other:?}"),
    }
}

#[test]
fn test_invalid_bins_checked_before_opening() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let config = HistogramConfig::new(temp_dir.path().join("does_not_exist.nc")).with_bins(-1);

    assert!(matches!(
        process_file(&config),
        Err(HistogramError::InvalidBinCount { bins: -1 })
    ));
}
