//! Archive extraction and shapefile summary tests on generated chart fixtures.

use std::fs::File;
use std::path::{Path, PathBuf};

use sea_ice::config::PipelineConfig;
use sea_ice::models::IceSummary;
use sea_ice::{archive, pipeline, shapes, summary};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing, Writer};
use tempfile::TempDir;

const PROJECTED_WKT: &str = r#"PROJCS["NAD83 / Canada Atlas Lambert",GEOGCS["NAD83",DATUM["North_American_Datum_1983",SPHEROID["GRS 1980",6378137,298.257222101]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic_2SP"],UNIT["metre",1]]"#;
const GEOGRAPHIC_WKT: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#;

fn square(x: f64, y: f64, side: f64) -> Polygon {
    // clockwise: outer ring
    Polygon::new(PolygonRing::Outer(vec![
        Point::new(x, y),
        Point::new(x, y + side),
        Point::new(x + side, y + side),
        Point::new(x + side, y),
        Point::new(x, y),
    ]))
}

/// Write `<dir>/<stem>.shp` (+ .shx, .dbf, .prj) with one polygon per
/// `(polygon, value)`, stored in a character column named `field`.
fn write_chart(dir: &Path, stem: &str, field: &str, wkt: &str, features: &[(Polygon, &str)]) {
    std::fs::create_dir_all(dir).unwrap();
    let shp = dir.join(format!("{stem}.shp"));

    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from(field).unwrap(), 10);
    let mut writer = Writer::from_path(&shp, table).expect("Failed to create shapefile");
    for (polygon, value) in features {
        let mut record = Record::default();
        record.insert(field.to_string(), FieldValue::Character(Some(value.to_string())));
        writer
            .write_shape_and_record(polygon, &record)
            .expect("Failed to write feature");
    }
    drop(writer);

    std::fs::write(shp.with_extension("prj"), wkt).unwrap();
}

/// Pack every file of `src` under `<stem>/` into `<tar_dir>/<stem>.tar`.
fn pack(src: &Path, tar_dir: &Path, stem: &str) -> PathBuf {
    std::fs::create_dir_all(tar_dir).unwrap();
    let tar_path = tar_dir.join(format!("{stem}.tar"));
    let mut builder = tar::Builder::new(File::create(&tar_path).unwrap());
    builder.append_dir_all(stem, src).unwrap();
    builder.finish().unwrap();
    tar_path
}

struct Fixture {
    _tmp: TempDir,
    config: PipelineConfig,
}

/// Three archives: a projected chart, a geographic chart, and one without CT.
fn fixture() -> Fixture {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let staging = tmp.path().join("staging");
    let tar_dir = tmp.path().join("data");

    let projected = "cis_SGRDREA_20191220T1800Z_pl_a";
    write_chart(
        &staging.join(projected),
        projected,
        "CT",
        PROJECTED_WKT,
        &[
            (square(0.0, 0.0, 1000.0), "90"),
            (square(5000.0, 0.0, 1000.0), "70"),
        ],
    );
    pack(&staging.join(projected), &tar_dir, projected);

    let geographic = "cis_SGRDREA_20201225T1800Z_pl_a";
    write_chart(
        &staging.join(geographic),
        geographic,
        "CT",
        GEOGRAPHIC_WKT,
        &[(square(-95.0, 60.0, 1.0), "55")],
    );
    pack(&staging.join(geographic), &tar_dir, geographic);

    let untagged = "cis_SGRDREA_20211222T1800Z_pl_a";
    write_chart(
        &staging.join(untagged),
        untagged,
        "CA",
        PROJECTED_WKT,
        &[(square(0.0, 0.0, 10.0), "40")],
    );
    pack(&staging.join(untagged), &tar_dir, untagged);

    std::fs::write(tar_dir.join("notes.txt"), "not an archive").unwrap();

    let config = PipelineConfig {
        download_dir: tar_dir,
        extract_dir: tmp.path().join("shapefiles"),
        summary_path: tmp.path().join("ice_data.json"),
        chart_path: tmp.path().join("ice_chart.png"),
        ..PipelineConfig::default()
    };
    Fixture { _tmp: tmp, config }
}

mod extraction {
    use super::*;

    #[test]
    fn unpacks_every_archive_in_name_order() {
        let f = fixture();
        let archives =
            archive::extract_tar_files(&f.config.download_dir, &f.config.extract_dir).unwrap();

        let names: Vec<_> = archives
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "cis_SGRDREA_20191220T1800Z_pl_a.tar",
                "cis_SGRDREA_20201225T1800Z_pl_a.tar",
                "cis_SGRDREA_20211222T1800Z_pl_a.tar",
            ]
        );

        let shapefiles = archive::find_shapefiles(&f.config.extract_dir).unwrap();
        assert_eq!(shapefiles.len(), 3);
        assert!(shapefiles.iter().all(|p| p.extension().unwrap() == "shp"));
    }

    #[test]
    fn missing_tar_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = archive::extract_tar_files(&tmp.path().join("absent"), tmp.path());
        assert!(result.is_err());
    }
}

mod summaries {
    use super::*;

    fn extracted() -> Fixture {
        let f = fixture();
        archive::extract_tar_files(&f.config.download_dir, &f.config.extract_dir).unwrap();
        f
    }

    #[test]
    fn projected_chart_uses_planar_area() {
        let f = extracted();
        let shp = f
            .config
            .extract_dir
            .join("cis_SGRDREA_20191220T1800Z_pl_a")
            .join("cis_SGRDREA_20191220T1800Z_pl_a.shp");

        let record = shapes::summarize_shapefile(&shp).unwrap().unwrap();
        assert_eq!(record.date, "20191220T1800Z");
        assert_eq!(record.average_ice_concentration, 80.0);
        assert!((record.total_area - 2.0e6).abs() < 1e-6);
    }

    #[test]
    fn geographic_chart_is_measured_in_atlas_lambert() {
        let f = extracted();
        let shp = f
            .config
            .extract_dir
            .join("cis_SGRDREA_20201225T1800Z_pl_a")
            .join("cis_SGRDREA_20201225T1800Z_pl_a.shp");

        let record = shapes::summarize_shapefile(&shp).unwrap().unwrap();
        assert_eq!(record.average_ice_concentration, 55.0);
        // one degree cell at 60°N, clockwise as written: about 5,780 km² in EPSG:3978
        assert!(
            record.total_area > 5.4e9 && record.total_area < 6.1e9,
            "total_area = {}",
            record.total_area
        );
    }

    #[test]
    fn chart_without_concentration_is_skipped() {
        let f = extracted();
        let shp = f
            .config
            .extract_dir
            .join("cis_SGRDREA_20211222T1800Z_pl_a")
            .join("cis_SGRDREA_20211222T1800Z_pl_a.shp");

        assert_eq!(shapes::summarize_shapefile(&shp).unwrap(), None);
    }

    #[test]
    fn missing_projection_file_is_an_error() {
        let f = extracted();
        let shp = f
            .config
            .extract_dir
            .join("cis_SGRDREA_20191220T1800Z_pl_a")
            .join("cis_SGRDREA_20191220T1800Z_pl_a.shp");
        std::fs::remove_file(shp.with_extension("prj")).unwrap();

        let err = shapes::summarize_shapefile(&shp).unwrap_err();
        assert!(matches!(err, shapes::ShapeError::MissingProjection(_)));
    }

    #[test]
    fn non_numeric_concentration_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let stem = "cis_SGRDREA_20221220T1800Z_pl_a";
        write_chart(
            tmp.path(),
            stem,
            "CT",
            PROJECTED_WKT,
            &[(square(0.0, 0.0, 1.0), "9+")],
        );

        let err = shapes::summarize_shapefile(&tmp.path().join(format!("{stem}.shp"))).unwrap_err();
        match err {
            shapes::ShapeError::NonNumeric { field, value, .. } => {
                assert_eq!(field, "CT");
                assert_eq!(value, "9+");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn process_skips_charts_without_concentration() {
        let f = extracted();
        let records = shapes::process_shapefiles(&f.config.extract_dir).unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["20191220T1800Z", "20201225T1800Z"]);
    }
}

mod process_stage {
    use super::*;

    #[test]
    fn writes_the_json_summary() {
        let f = fixture();
        let count = pipeline::process(&f.config).unwrap();
        assert_eq!(count, 2);

        let text = std::fs::read_to_string(&f.config.summary_path).unwrap();
        assert!(text.starts_with("[\n    {"));
        assert!(text.contains("\"average_ice_concentration\": 80.0"));

        let records: Vec<IceSummary> = summary::load_summary(&f.config.summary_path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "20191220T1800Z");
        assert_eq!(records[1].date, "20201225T1800Z");
    }

    #[test]
    fn empty_download_dir_writes_an_empty_list() {
        let tmp = TempDir::new().unwrap();
        let config = PipelineConfig {
            download_dir: tmp.path().to_path_buf(),
            extract_dir: tmp.path().join("shapefiles"),
            summary_path: tmp.path().join("ice_data.json"),
            ..PipelineConfig::default()
        };

        assert_eq!(pipeline::process(&config).unwrap(), 0);
        assert!(summary::load_summary(&config.summary_path).unwrap().is_empty());
    }
}
