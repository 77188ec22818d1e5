use crate::error::Result;
use crate::model::CanonicalResult;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Exported row: division, round, player 1, score 1, player 2, score 2
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow<'a> {
    pub division: &'a str,
    pub round: u32,
    pub player1: &'a str,
    pub score1: i32,
    pub player2: &'a str,
    pub score2: i32,
}

impl<'a> From<&'a CanonicalResult> for ResultRow<'a> {
    fn from(result: &'a CanonicalResult) -> Self {
        Self {
            division: &result.division,
            round: result.round,
            player1: &result.player1,
            score1: result.score1,
            player2: &result.player2,
            score2: result.score2,
        }
    }
}

/// Write results as header-less CSV
pub fn write_csv<'a, W, I>(results: I, out: W) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalResult>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    for result in results {
        writer.serialize(ResultRow::from(result))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write results to a CSV file
pub fn write_csv_file<'a, I>(results: I, path: &Path) -> Result<()>
where
    I: IntoIterator<Item = &'a CanonicalResult>,
{
    let file = std::fs::File::create(path)?;
    write_csv(results, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(round: u32, player1: &str, score1: i32, player2: &str, score2: i32) -> CanonicalResult {
        CanonicalResult {
            division: "A".to_string(),
            round,
            player1: player1.to_string(),
            score1,
            player2: player2.to_string(),
            score2,
        }
    }

    #[test]
    fn test_row_projection() {
        let result = game(3, "Ann Lee", 412, "Bo Chen", 389);
        let row = ResultRow::from(&result);
        assert_eq!(row.division, "A");
        assert_eq!(row.round, 3);
        assert_eq!(row.player1, "Ann Lee");
        assert_eq!(row.score1, 412);
        assert_eq!(row.player2, "Bo Chen");
        assert_eq!(row.score2, 389);
    }

    #[test]
    fn test_write_csv_has_no_header() {
        let results = vec![
            game(1, "Ann Lee", 1, "Bo Chen", 0),
            game(2, "Cy Diaz", -15, "Ann Lee", 402),
        ];
        let mut out = Vec::new();
        write_csv(&results, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "A,1,Ann Lee,1,Bo Chen,0\nA,2,Cy Diaz,-15,Ann Lee,402\n"
        );
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_csv_file(&[game(1, "Ann Lee", 1, "Bo Chen", 0)], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "A,1,Ann Lee,1,Bo Chen,0\n");
    }
}
