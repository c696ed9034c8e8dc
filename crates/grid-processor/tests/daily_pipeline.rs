//! End-to-end test of the processing core: aggregate a synthetic forecast
//! field, derive the output grid, and interpolate each day.

use chrono::NaiveDate;
use ndarray::Array4;

use grid_processor::{aggregate_daily, IdwInterpolator, RasterGrid};
use rain_common::{PrecipitationField, TimeCoding};

fn synthetic_field() -> PrecipitationField {
    // Four 3-hourly steps spanning two days over a 2x3 grid.
    let mut values = Array4::<f64>::zeros((4, 1, 2, 3));
    for t in 0..4 {
        for i in 0..2 {
            for j in 0..3 {
                values[[t, 0, i, j]] = (t + 1) as f64 * 0.5 + i as f64 + j as f64;
            }
        }
    }

    PrecipitationField::new(
        values,
        vec![-6.0, -6.5],
        vec![106.0, 106.5, 107.0],
        vec![18.0, 21.0, 24.0, 27.0],
        TimeCoding {
            units: "hours since 2024-01-14 00:00:00".to_string(),
            calendar: Some("standard".to_string()),
        },
    )
    .unwrap()
}

#[test]
fn aggregates_then_interpolates_each_day() {
    let field = synthetic_field();
    let daily = aggregate_daily(&field).unwrap();

    // Steps 18h/21h fall on the 14th, 24h/27h on the 15th.
    assert_eq!(daily.len(), 2);
    let first = &daily[&NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()];
    let second = &daily[&NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()];
    assert_eq!(first.samples.len(), 6);

    // Cell (0, 0): steps contribute 0.5 and 1.0 on day one, 1.5 and 2.0 on
    // day two.
    let corner = |day: &grid_processor::DailySamples| {
        day.samples
            .iter()
            .find(|s| s.x == 106.0 && s.y == -6.0)
            .unwrap()
            .value
    };
    assert_eq!(corner(first), 1.5);
    assert_eq!(corner(second), 3.5);

    for day in daily.values() {
        let grid = RasterGrid::from_samples(&day.samples, 0.25).unwrap();
        assert_eq!((grid.width(), grid.height()), (5, 3));

        let idw = IdwInterpolator::new(&day.samples, 2.0, 10).unwrap();
        let surface = idw.interpolate(&grid);
        assert_eq!(surface.dim(), (3, 5));

        // Grid points that coincide with samples reproduce them exactly.
        let nw = day
            .samples
            .iter()
            .find(|s| s.x == 106.0 && s.y == -6.0)
            .unwrap();
        assert_eq!(surface[[0, 0]], nw.value);
    }
}
