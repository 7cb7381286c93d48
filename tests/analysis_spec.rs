use sea_ice::analysis::{self, AnalysisError, PolynomialFit};
use sea_ice::models::YearExtent;
use speculate2::speculate;

fn extents(values: &[(i32, f64)]) -> Vec<YearExtent> {
    values.iter().map(|&(y, e)| YearExtent::new(y, e)).collect()
}

speculate! {
    describe "detect_outliers" {
        it "flags values beyond 1.5 IQR" {
            let data = extents(&[
                (2000, 10.0), (2001, 11.0), (2002, 12.0),
                (2003, 13.0), (2004, 14.0), (2005, 100.0),
            ]);
            let report = analysis::detect_outliers(&data).expect("Detection failed");

            assert!((report.lower_bound - 7.5).abs() < 1e-12);
            assert!((report.upper_bound - 17.5).abs() < 1e-12);
            assert_eq!(report.outliers, vec![YearExtent::new(2005, 100.0)]);
        }

        it "treats values on the bounds as inliers" {
            // Q1 = 2, Q3 = 4, bounds [-1, 7]
            let data = extents(&[
                (1, -1.0), (2, 2.0), (3, 2.0), (4, 3.0), (5, 3.0),
                (6, 3.0), (7, 4.0), (8, 4.0), (9, 7.0),
            ]);
            let report = analysis::detect_outliers(&data).unwrap();
            assert!(report.outliers.is_empty());
            assert_eq!(analysis::retain_inliers(&data, &report), data);
        }

        it "finds nothing in a constant series" {
            let data = extents(&[(2000, 12.0), (2001, 12.0), (2002, 12.0)]);
            let report = analysis::detect_outliers(&data).unwrap();
            assert!(report.outliers.is_empty());
            assert_eq!(report.lower_bound, 12.0);
            assert_eq!(report.upper_bound, 12.0);
        }

        it "rejects an empty series" {
            assert_eq!(analysis::detect_outliers(&[]), Err(AnalysisError::Empty));
        }
    }

    describe "retain_inliers" {
        it "keeps the remaining rows in order" {
            let data = extents(&[(2000, 10.0), (2001, 100.0), (2002, 12.0), (2003, 13.0), (2004, 11.0), (2005, 14.0)]);
            let report = analysis::detect_outliers(&data).unwrap();
            let kept = analysis::retain_inliers(&data, &report);
            let years: Vec<i32> = kept.iter().map(|d| d.year).collect();
            assert_eq!(years, vec![2000, 2002, 2003, 2004, 2005]);
        }
    }

    describe "PolynomialFit" {
        it "recovers a parabola over calendar years" {
            let xs: Vec<f64> = (1979..=2020).map(f64::from).collect();
            let ys: Vec<f64> = xs.iter().map(|x| 14.0 - 0.002 * (x - 1979.0).powi(2)).collect();
            let fit = sea_ice::analysis::PolynomialFit::fit(&xs, &ys, 2).expect("Fit failed");
            assert_eq!(fit.degree(), 2);
            assert!((fit.predict(2050.0) - (14.0 - 0.002 * 71.0_f64.powi(2))).abs() < 1e-8);
        }

        it "needs more points than the degree" {
            let err = sea_ice::analysis::PolynomialFit::fit(&[2000.0, 2001.0], &[1.0, 2.0], 2).unwrap_err();
            assert_eq!(err, AnalysisError::InsufficientData { degree: 2, needed: 3, got: 2 });
        }
    }

    describe "generate_projections" {
        it "continues the years from the last observation" {
            let data = extents(&[(1990, 13.0), (1995, 12.5), (2000, 12.0)]);
            let projection = analysis::generate_projections(&data, 3, 1).unwrap();

            assert_eq!(projection.years, vec![1990, 1995, 2000, 2001, 2002, 2003]);
            assert_eq!(projection.linear.len(), 6);
            assert_eq!(projection.polynomial.len(), 6);
            assert!((projection.linear[5] - 11.7).abs() < 1e-9);
        }

        it "follows file order for the last year" {
            let data = extents(&[(2005, 12.0), (2001, 13.0), (2003, 12.5)]);
            let projection = analysis::generate_projections(&data, 2, 1).unwrap();
            assert_eq!(projection.years, vec![2005, 2001, 2003, 2004, 2005]);
        }

        it "evaluates only observed years when there is no horizon" {
            let data = extents(&[(2000, 12.0), (2001, 11.0), (2002, 10.5)]);
            let projection = analysis::generate_projections(&data, 0, 2).unwrap();
            assert_eq!(projection.years, vec![2000, 2001, 2002]);
            // three points, degree two: exact interpolation
            for (value, expected) in projection.polynomial.iter().zip([12.0, 11.0, 10.5]) {
                assert!((value - expected).abs() < 1e-9);
            }
        }

        it "rejects an empty series" {
            assert_eq!(analysis::generate_projections(&[], 30, 2), Err(AnalysisError::Empty));
        }

        it "rejects a horizon past the end of the calendar" {
            let data = extents(&[(2000, 12.0), (2001, 11.0), (2002, 10.5)]);
            assert_eq!(
                analysis::generate_projections(&data, u32::MAX, 2),
                Err(AnalysisError::Horizon { last: 2002, future_years: u32::MAX })
            );
            let near_limit = (i32::MAX - 2002) as u32 + 1;
            assert!(matches!(
                analysis::generate_projections(&data, near_limit, 1),
                Err(AnalysisError::Horizon { .. })
            ));
        }

        it "rejects too few points for the polynomial" {
            let data = extents(&[(2000, 12.0), (2001, 11.0)]);
            assert!(matches!(
                analysis::generate_projections(&data, 30, 2),
                Err(AnalysisError::InsufficientData { .. })
            ));
        }
    }
}
