//! Minimal GRIB2 message builder.
//!
//! Produces single-field messages on a regular lat/lon grid (template 3.0)
//! with a horizontal-level product (template 4.0) and simple packing
//! (template 5.0). Values are packed at one decimal digit of precision and
//! NaN values are written as missing through a bitmap.

/// Builder for a single GRIB2 message.
#[derive(Debug, Clone)]
pub struct Grib2Builder {
    discipline: u8,
    center: u16,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    // Grid definition
    ni: u32,  // columns
    nj: u32,  // rows
    la1: i32, // first lat (microdegrees)
    lo1: i32, // first lon (microdegrees)
    step: u32, // increment on both axes (microdegrees)
    // Product definition
    param_category: u8,
    param_number: u8,
    level_type: u8,
    level_value: u32,
    forecast_unit: u8,
    forecast_value: u32,
    data_values: Vec<f32>,
}

/// Digits kept by the packing (values are stored in tenths).
const DECIMAL_SCALE: i16 = 1;

impl Grib2Builder {
    /// A 4x5 (rows x cols) U-wind message at 850 hPa, 1 degree spacing,
    /// starting at 60 N 0 E, reference time 2020-01-01 00:00 UTC.
    pub fn new() -> Self {
        let ni = 5;
        let nj = 4;
        Self {
            discipline: 0, // Meteorological
            center: 98,    // ECMWF
            year: 2020,
            month: 1,
            day: 1,
            hour: 0,
            ni,
            nj,
            la1: 60_000_000,
            lo1: 0,
            step: 1_000_000,
            param_category: 2,
            param_number: 2, // UGRD
            level_type: 100, // isobaric
            level_value: 85_000,
            forecast_unit: 1, // hours
            forecast_value: 0,
            data_values: vec![0.0; (ni * nj) as usize],
        }
    }

    /// U component of wind (0, 2, 2).
    pub fn u_wind() -> Self {
        Self::new().with_parameter(2, 2)
    }

    /// V component of wind (0, 2, 3).
    pub fn v_wind() -> Self {
        Self::new().with_parameter(2, 3)
    }

    pub fn with_reference_time(mut self, year: u16, month: u8, day: u8, hour: u8) -> Self {
        self.year = year;
        self.month = month;
        self.day = day;
        self.hour = hour;
        self
    }

    /// Resize the grid; existing data is replaced with zeros.
    pub fn with_grid(mut self, rows: u32, cols: u32) -> Self {
        self.ni = cols;
        self.nj = rows;
        self.data_values = vec![0.0; (rows * cols) as usize];
        self
    }

    /// North-west corner and spacing, in degrees. Must be non-negative.
    pub fn with_origin(mut self, lat_north: f64, lon_west: f64, step: f64) -> Self {
        self.la1 = (lat_north * 1e6).round() as i32;
        self.lo1 = (lon_west * 1e6).round() as i32;
        self.step = (step * 1e6).round() as u32;
        self
    }

    pub fn with_parameter(mut self, category: u8, number: u8) -> Self {
        self.param_category = category;
        self.param_number = number;
        self
    }

    /// Level type (Code Table 4.5) and value in the type's base unit
    /// (Pa for isobaric levels).
    pub fn with_level(mut self, level_type: u8, level_value: u32) -> Self {
        self.level_type = level_type;
        self.level_value = level_value;
        self
    }

    /// Forecast offset in units of Code Table 4.4.
    pub fn with_forecast(mut self, unit: u8, value: u32) -> Self {
        self.forecast_unit = unit;
        self.forecast_value = value;
        self
    }

    pub fn with_constant_value(mut self, value: f32) -> Self {
        self.data_values = vec![value; (self.ni * self.nj) as usize];
        self
    }

    /// Row-major values, row 0 at the northern edge.
    pub fn with_data(mut self, data: Vec<f32>) -> Self {
        self.data_values = data;
        self
    }

    /// Build the complete GRIB2 message bytes
    pub fn build(&self) -> Vec<u8> {
        let section1 = self.build_section1();
        let section3 = self.build_section3();
        let section4 = self.build_section4();
        let section5 = self.build_section5();
        let section6 = self.build_section6();
        let section7 = self.build_section7();

        let message_length = 16 // Section 0
            + section1.len()
            + section3.len()
            + section4.len()
            + section5.len()
            + section6.len()
            + section7.len()
            + 4; // Section 8

        let mut message = Vec::with_capacity(message_length);

        // Section 0: Indicator
        message.extend_from_slice(b"GRIB");
        message.extend_from_slice(&[0, 0]); // Reserved
        message.push(self.discipline);
        message.push(2); // Edition 2
        message.extend_from_slice(&(message_length as u64).to_be_bytes());

        for section in [section1, section3, section4, section5, section6, section7] {
            message.extend_from_slice(&section);
        }

        // Section 8: End
        message.extend_from_slice(b"7777");

        message
    }

    /// Concatenate several messages into one file image.
    pub fn build_file(messages: &[Grib2Builder]) -> Vec<u8> {
        messages.iter().flat_map(|m| m.build()).collect()
    }

    fn num_points(&self) -> u32 {
        self.ni * self.nj
    }

    fn present_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data_values.iter().copied().filter(|v| !v.is_nan())
    }

    fn has_missing(&self) -> bool {
        self.data_values.iter().any(|v| v.is_nan())
    }

    /// Scaled integer range of present values: (min, max) in tenths.
    fn scaled_range(&self) -> (f32, f32) {
        let factor = 10f32.powi(DECIMAL_SCALE as i32);
        self.present_values()
            .map(|v| (v * factor).round())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), v| {
                (min.min(v), max.max(v))
            })
    }

    fn build_section1(&self) -> Vec<u8> {
        let mut section = Vec::with_capacity(21);
        section.extend_from_slice(&21u32.to_be_bytes());
        section.push(1);

        section.extend_from_slice(&self.center.to_be_bytes());
        section.extend_from_slice(&0u16.to_be_bytes()); // Sub-center
        section.push(2); // Master table version
        section.push(0); // Local table version
        section.push(1); // Significance of reference time (start of forecast)

        section.extend_from_slice(&self.year.to_be_bytes());
        section.push(self.month);
        section.push(self.day);
        section.push(self.hour);
        section.push(0); // Minute
        section.push(0); // Second

        section.push(0); // Production status (operational)
        section.push(1); // Type of data (forecast)
        section
    }

    fn build_section3(&self) -> Vec<u8> {
        let mut section = Vec::with_capacity(72);
        section.extend_from_slice(&72u32.to_be_bytes());
        section.push(3);

        section.push(0); // Source of grid definition
        section.extend_from_slice(&self.num_points().to_be_bytes());
        section.push(0); // Octets for optional list
        section.push(0); // Interpretation of optional list
        section.extend_from_slice(&0u16.to_be_bytes()); // Template 3.0

        section.push(6); // Shape of Earth (sphere, 6371229 m)
        section.push(0);
        section.extend_from_slice(&0u32.to_be_bytes());
        section.push(0);
        section.extend_from_slice(&0u32.to_be_bytes());
        section.push(0);
        section.extend_from_slice(&0u32.to_be_bytes());

        section.extend_from_slice(&self.ni.to_be_bytes());
        section.extend_from_slice(&self.nj.to_be_bytes());
        section.extend_from_slice(&0u32.to_be_bytes()); // Basic angle
        section.extend_from_slice(&u32::MAX.to_be_bytes()); // Subdivisions

        let la2 = self.la1 - (self.nj.saturating_sub(1) * self.step) as i32;
        let lo2 = self.lo1 + (self.ni.saturating_sub(1) * self.step) as i32;

        section.extend_from_slice(&grib_i32(self.la1));
        section.extend_from_slice(&grib_i32(self.lo1));
        section.push(48); // Resolution and component flags
        section.extend_from_slice(&grib_i32(la2));
        section.extend_from_slice(&grib_i32(lo2));
        section.extend_from_slice(&self.step.to_be_bytes()); // Di
        section.extend_from_slice(&self.step.to_be_bytes()); // Dj
        section.push(0); // Scanning mode: +i, -j, rows consecutive
        section
    }

    fn build_section4(&self) -> Vec<u8> {
        let mut section = Vec::with_capacity(34);
        section.extend_from_slice(&34u32.to_be_bytes());
        section.push(4);

        section.extend_from_slice(&0u16.to_be_bytes()); // Coordinate values
        section.extend_from_slice(&0u16.to_be_bytes()); // Template 4.0

        section.push(self.param_category);
        section.push(self.param_number);
        section.push(2); // Generating process (forecast)
        section.push(0); // Background process
        section.push(0); // Analysis or forecast process
        section.extend_from_slice(&0u16.to_be_bytes()); // Hours of cutoff
        section.push(0); // Minutes of cutoff
        section.push(self.forecast_unit);
        section.extend_from_slice(&self.forecast_value.to_be_bytes());

        section.push(self.level_type);
        section.push(0); // Scale factor
        section.extend_from_slice(&self.level_value.to_be_bytes());

        section.push(255); // No second surface
        section.push(0);
        section.extend_from_slice(&0u32.to_be_bytes());
        section
    }

    fn build_section5(&self) -> Vec<u8> {
        let encoded_points = self.present_values().count() as u32;
        let (min, max) = self.scaled_range();
        let (reference, bits) = if encoded_points == 0 {
            (0.0f32, 0u8)
        } else if max > min {
            (min, 16u8)
        } else {
            (min, 0u8)
        };

        let mut section = Vec::with_capacity(21);
        section.extend_from_slice(&21u32.to_be_bytes());
        section.push(5);

        section.extend_from_slice(&encoded_points.to_be_bytes());
        section.extend_from_slice(&0u16.to_be_bytes()); // Template 5.0

        section.extend_from_slice(&reference.to_be_bytes());
        section.extend_from_slice(&grib_i16(0)); // Binary scale factor
        section.extend_from_slice(&grib_i16(DECIMAL_SCALE));
        section.push(bits);
        section.push(0); // Original values are floating point
        section
    }

    fn build_section6(&self) -> Vec<u8> {
        let mut section = Vec::new();
        if !self.has_missing() {
            section.extend_from_slice(&6u32.to_be_bytes());
            section.push(6);
            section.push(255); // No bitmap
            return section;
        }

        let mut bitmap = vec![0u8; (self.data_values.len() + 7) / 8];
        for (i, value) in self.data_values.iter().enumerate() {
            if !value.is_nan() {
                bitmap[i / 8] |= 0b1000_0000 >> (i % 8);
            }
        }

        section.extend_from_slice(&(6 + bitmap.len() as u32).to_be_bytes());
        section.push(6);
        section.push(0); // Bitmap follows
        section.extend_from_slice(&bitmap);
        section
    }

    fn build_section7(&self) -> Vec<u8> {
        let packed = self.pack_simple();

        let mut section = Vec::with_capacity(5 + packed.len());
        section.extend_from_slice(&(5 + packed.len() as u32).to_be_bytes());
        section.push(7);
        section.extend_from_slice(&packed);
        section
    }

    /// value = (R + X) * 10^-D with a binary scale of zero.
    fn pack_simple(&self) -> Vec<u8> {
        let (min, max) = self.scaled_range();
        if max <= min {
            return Vec::new();
        }

        let factor = 10f32.powi(DECIMAL_SCALE as i32);
        self.present_values()
            .flat_map(|v| {
                let packed = ((v * factor).round() - min) as u16;
                packed.to_be_bytes()
            })
            .collect()
    }
}

impl Default for Grib2Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign-and-magnitude encoding used by GRIB2 for signed integers.
fn grib_i16(value: i16) -> [u8; 2] {
    let magnitude = value.unsigned_abs() & 0x7fff;
    let raw = if value < 0 { magnitude | 0x8000 } else { magnitude };
    raw.to_be_bytes()
}

fn grib_i32(value: i32) -> [u8; 4] {
    let magnitude = value.unsigned_abs() & 0x7fff_ffff;
    let raw = if value < 0 { magnitude | 0x8000_0000 } else { magnitude };
    raw.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_framing() {
        let data = Grib2Builder::u_wind().build();

        assert_eq!(&data[0..4], b"GRIB");
        assert_eq!(data[6], 0); // Meteorological
        assert_eq!(data[7], 2); // Edition
        let length = u64::from_be_bytes(data[8..16].try_into().unwrap());
        assert_eq!(length as usize, data.len());
        assert_eq!(&data[data.len() - 4..], b"7777");
    }

    #[test]
    fn test_sign_magnitude() {
        assert_eq!(grib_i16(1), [0x00, 0x01]);
        assert_eq!(grib_i16(-1), [0x80, 0x01]);
        assert_eq!(grib_i32(-10_000_000), (10_000_000u32 | 0x8000_0000).to_be_bytes());
    }

    #[test]
    fn test_bitmap_marks_missing_values() {
        let builder = Grib2Builder::new()
            .with_grid(1, 3)
            .with_data(vec![1.0, f32::NAN, 2.0]);

        let section6 = builder.build_section6();
        assert_eq!(section6[5], 0);
        assert_eq!(section6[6], 0b1010_0000);

        // Two encoded points of 16 bits each
        assert_eq!(builder.build_section7().len(), 5 + 4);
    }

    #[test]
    fn test_file_concatenates_messages() {
        let single = Grib2Builder::u_wind().build().len();
        let file = Grib2Builder::build_file(&[Grib2Builder::u_wind(), Grib2Builder::v_wind()]);
        assert_eq!(file.len(), single * 2);
    }
}
