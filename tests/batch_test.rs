use anyhow::Result;
use std::fs::File;
use std::io::Write;
use sustainability_index::app::batch::{score_csv, BatchSummary};
use sustainability_index::{ScoringConfig, SustainabilityEngine};
use tempfile::NamedTempFile;

const HEADER: &str = "name,green_space_area,total_area,water_area,air_quality_aod,land_surface_temperature,mean_ndvi,tasseled_cap_wetness,mean_lst_for_eqi,ndbsi,pm25,total_population,total_crimes,adults_with_degree,total_adult_population,avg_time_to_transit,avg_time_to_schools,avg_time_to_hospitals,avg_time_to_fire_stations,avg_time_to_police,street_intersections,median_household_income,unemployed_count,labor_force,affordable_housing_units,total_housing_units";

#[test]
fn test_batch_from_csv_file() -> Result<()> {
    let mut input = NamedTempFile::new()?;
    writeln!(input, "{}", HEADER)?;
    writeln!(
        input,
        "Riverside,250000,1000000,50000,0.3,25,0.5,0.3,25,0.4,20,10000,50,3000,8000,5,8,12,6,10,120,50000,500,6000,700,1000"
    )?;
    writeln!(
        input,
        "Hillcrest,600000,1000000,20000,0.1,18,0.8,0.2,18,0.1,5,4000,8,2500,3000,3,4,6,5,5,300,140000,80,2200,400,1500"
    )?;
    writeln!(
        input,
        "Empty Lot,0,0,0,0.3,25,0.5,0.3,25,0.4,20,10,0,0,5,5,8,12,6,10,0,0,0,1,0,1"
    )?;
    writeln!(
        input,
        "Typo,abc,1000000,50000,0.3,25,0.5,0.3,25,0.4,20,10000,50,3000,8000,5,8,12,6,10,120,50000,500,6000,700,1000"
    )?;
    input.flush()?;

    let engine = SustainabilityEngine::new(ScoringConfig::default())?;
    let mut output = Vec::new();
    let summary = score_csv(&engine, File::open(input.path())?, &mut output)?;

    assert_eq!(
        summary,
        BatchSummary {
            scored: 2,
            failed: 2
        }
    );

    let mut reader = csv::Reader::from_reader(output.as_slice());
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 4);

    assert_eq!(&rows[0][0], "Riverside");
    assert_eq!(&rows[0][2], "C");
    assert_eq!(&rows[0][6], "");

    assert_eq!(&rows[1][0], "Hillcrest");
    let hillcrest: f64 = rows[1][1].parse()?;
    let riverside: f64 = rows[0][1].parse()?;
    assert!(hillcrest > riverside);

    assert_eq!(&rows[2][0], "Empty Lot");
    assert_eq!(&rows[2][1], "");
    assert!(rows[2][6].contains("total_area must be greater than zero"));

    assert_eq!(&rows[3][0], "Typo");
    assert!(rows[3][6].contains("environmental.green_area must be a number"));
    Ok(())
}

#[test]
fn test_ragged_csv_is_an_error() -> Result<()> {
    let engine = SustainabilityEngine::new(ScoringConfig::default())?;
    let input = format!("{}\nShort,1,2,3\n", HEADER);
    let mut output = Vec::new();

    assert!(score_csv(&engine, input.as_bytes(), &mut output).is_err());
    Ok(())
}
