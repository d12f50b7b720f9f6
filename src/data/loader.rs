use crate::data::{ApiGroup, MeasurementRecord, Metric};
use crate::error::{Result, StatsError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The two measurement logs, fully materialised in memory.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSet {
    pub rest: Vec<MeasurementRecord>,
    pub graphql: Vec<MeasurementRecord>,
}

impl MeasurementSet {
    pub fn new(rest: Vec<MeasurementRecord>, graphql: Vec<MeasurementRecord>) -> Self {
        MeasurementSet { rest, graphql }
    }

    pub fn group(&self, group: ApiGroup) -> &[MeasurementRecord] {
        match group {
            ApiGroup::Rest => &self.rest,
            ApiGroup::GraphQl => &self.graphql,
        }
    }

    /// Every record from both logs, REST first.
    pub fn all(&self) -> impl Iterator<Item = &MeasurementRecord> {
        self.rest.iter().chain(self.graphql.iter())
    }
}

/// Load both measurement logs.
///
/// Both paths are checked before either file is opened so that a missing
/// input is reported once, naming every expected path.
pub fn load_measurements(rest_path: &Path, graphql_path: &Path) -> Result<MeasurementSet> {
    if !rest_path.exists() || !graphql_path.exists() {
        return Err(StatsError::InputMissing {
            paths: vec![rest_path.to_path_buf(), graphql_path.to_path_buf()],
        });
    }

    let rest = read_records(rest_path)?;
    let graphql = read_records(graphql_path)?;
    info!(
        rest = rest.len(),
        graphql = graphql.len(),
        "loaded measurement logs"
    );
    Ok(MeasurementSet::new(rest, graphql))
}

fn read_records(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let parse_error = |source: csv::Error| StatsError::Parse {
        path: PathBuf::from(path),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(parse_error)?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<MeasurementRecord>().enumerate() {
        let record = row.map_err(parse_error)?;
        // Header is line 1
        check_metrics(&record, path, index + 2)?;
        records.push(record);
    }

    debug!(path = %path.display(), records = records.len(), "parsed measurement file");
    Ok(records)
}

fn check_metrics(record: &MeasurementRecord, path: &Path, line: usize) -> Result<()> {
    for metric in Metric::ALL {
        let value = record.value(metric);
        if !value.is_finite() || value < 0.0 {
            return Err(StatsError::InvalidMeasurement {
                path: path.to_path_buf(),
                line,
                column: metric.column(),
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QueryId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const COLLECTOR_HEADER: &str = "id_execucao,usuario,consulta,tipo_api,\
        tempo_resposta_ms,tamanho_resposta_kb,status_code,timestamp,observacoes";
    const ENGLISH_HEADER: &str = "run_id,subject,query_id,group,\
        response_time_ms,response_size_kb,status_code,timestamp,note";

    fn write_csv(header: &str, rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", header).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_collector_headers() {
        let rest = write_csv(
            COLLECTOR_HEADER,
            &[
                "1,bradfitz,C1,REST,120.5,14.2,200,2025-03-01T10:00:00.123,OK",
                "2,bradfitz,C3,REST,98.0,0.0,403,2025-03-01T10:00:02.000,Erro 403",
            ],
        );
        let graphql = write_csv(
            ENGLISH_HEADER,
            &["1,bradfitz,C2,GraphQL,80.25,1.5,200,2025-03-01T10:01:00,OK"],
        );

        let set = load_measurements(rest.path(), graphql.path()).unwrap();
        assert_eq!(set.rest.len(), 2);
        assert_eq!(set.graphql.len(), 1);
        assert_eq!(set.rest[0].query_id, QueryId::List);
        assert_eq!(set.rest[1].status_code, 403);
        assert_eq!(set.graphql[0].group, ApiGroup::GraphQl);
        assert_eq!(set.all().count(), 3);
    }

    #[test]
    fn missing_file_is_fatal_and_names_both_paths() {
        let rest = write_csv(ENGLISH_HEADER, &[]);
        let missing = Path::new("/definitely/not/here.csv");
        match load_measurements(rest.path(), missing) {
            Err(StatsError::InputMissing { paths }) => {
                assert_eq!(paths.len(), 2);
                assert_eq!(paths[1], missing);
            }
            other => panic!("expected InputMissing, got {:?}", other),
        }
    }

    #[test]
    fn unknown_query_tag_is_a_parse_error() {
        let rest = write_csv(
            ENGLISH_HEADER,
            &["1,u,C9,REST,1.0,1.0,200,2025-03-01T10:00:00,OK"],
        );
        let graphql = write_csv(ENGLISH_HEADER, &[]);
        assert!(matches!(
            load_measurements(rest.path(), graphql.path()),
            Err(StatsError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_and_negative_metrics() {
        let graphql = write_csv(ENGLISH_HEADER, &[]);
        let cases = [
            ("1,u,C1,REST,NaN,1.0,200,2025-03-01T10:00:00,OK", "response_time_ms"),
            ("1,u,C1,REST,12.0,-0.5,200,2025-03-01T10:00:00,OK", "response_size_kb"),
            ("1,u,C1,REST,inf,1.0,200,2025-03-01T10:00:00,OK", "response_time_ms"),
        ];

        for (row, column) in cases {
            let rest = write_csv(
                ENGLISH_HEADER,
                &["1,u,C1,REST,10.0,1.0,200,2025-03-01T10:00:00,OK", row],
            );
            match load_measurements(rest.path(), graphql.path()) {
                Err(StatsError::InvalidMeasurement { line, column: got, .. }) => {
                    assert_eq!(line, 3);
                    assert_eq!(got, column);
                }
                other => panic!("expected InvalidMeasurement for {:?}, got {:?}", row, other),
            }
        }
    }

    #[test]
    fn zero_sized_failures_are_accepted() {
        let rest = write_csv(
            ENGLISH_HEADER,
            &["1,u,C1,REST,0.0,0.0,504,2025-03-01T10:00:00,Timeout"],
        );
        let graphql = write_csv(ENGLISH_HEADER, &[]);
        let set = load_measurements(rest.path(), graphql.path()).unwrap();
        assert_eq!(set.rest[0].response_size_kb, 0.0);
    }
}
