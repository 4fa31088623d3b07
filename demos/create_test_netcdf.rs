//! Creates a sample EOS-06 style NetCDF file for trying out nc_histogram.
//!
//! The file holds coordinate variables, a float sea surface temperature field
//! with cloud gaps marked by `_FillValue`, and a packed `int16` chlorophyll
//! field that needs `scale_factor`/`add_offset` decoding.

use ndarray::{Array1, Array3};
use netcdf::create;
use std::path::Path;

const FILL: f32 = -999.0;
const PACKED_FILL: i16 = -32768;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = Path::new("eos06_sample.nc");

    println!("🔨 Creating sample NetCDF file: {}", output_path.display());

    if output_path.exists() {
        std::fs::remove_file(output_path)?
    }

    let mut file = create(output_path)?;

    file.add_attribute("title", "EOS-06 Ocean Colour Monitor sample")?;
    file.add_attribute("institution", "nc_histogram demo")?;

    let (n_time, n_lat, n_lon) = (4, 20, 30);
    file.add_dimension("time", n_time)?;
    file.add_dimension("lat", n_lat)?;
    file.add_dimension("lon", n_lon)?;

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "days since 2024-01-01")?;
        let time_data: Vec<f64> = (0..n_time).map(|i| i as f64).collect();
        time_var.put(Array1::from(time_data).view(), ..)?;
    }

    {
        let mut lat_var = file.add_variable::<f32>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        let lat_data: Vec<f32> = (0..n_lat).map(|i| 5.0 + i as f32 * 0.5).collect();
        lat_var.put(Array1::from(lat_data).view(), ..)?;
    }

    {
        let mut lon_var = file.add_variable::<f32>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        let lon_data: Vec<f32> = (0..n_lon).map(|i| 70.0 + i as f32 * 0.5).collect();
        lon_var.put(Array1::from(lon_data).view(), ..)?;
    }

    {
        let mut sst_var = file.add_variable::<f32>("sst", &["time", "lat", "lon"])?;
        sst_var.put_attribute("units", "K")?;
        sst_var.put_attribute("long_name", "sea surface temperature")?;
        sst_var.put_attribute("_FillValue", FILL)?;

        let sst = Array3::from_shape_fn((n_time, n_lat, n_lon), |(t, y, x)| {
            // Cloud-covered pixels
            if (t + y * 3 + x * 7) % 11 == 0 {
                return FILL;
            }
            300.0 - y as f32 * 0.2 + (x as f32 * 0.3).sin() + t as f32 * 0.1
        });
        sst_var.put(sst.view(), ..)?;
    }

    {
        let mut chl_var = file.add_variable::<i16>("chlorophyll", &["time", "lat", "lon"])?;
        chl_var.put_attribute("units", "mg m-3")?;
        chl_var.put_attribute("scale_factor", 0.001f32)?;
        chl_var.put_attribute("add_offset", 0.0f32)?;
        chl_var.put_attribute("_FillValue", PACKED_FILL)?;

        let chl = Array3::from_shape_fn((n_time, n_lat, n_lon), |(t, y, x)| {
            if y < 2 {
                return PACKED_FILL;
            }
            ((x * 37 + y * 11 + t * 5) % 2000) as i16
        });
        chl_var.put(chl.view(), ..)?;
    }

    println!("✅ Successfully created sample NetCDF file with:");
    println!("   📏 Dimensions: time({n_time}), lat({n_lat}), lon({n_lon})");
    println!("   📈 Variables: time, lat, lon, sst, chlorophyll");
    println!("\n🧪 Generate histograms with:");
    println!("   cargo run -- eos06_sample.nc -o histograms -b 40");

    Ok(())
}
