use serde::Deserialize;
use std::io::Read;

/// Raw row from the majors table before normalization and joining.
#[derive(Debug, Deserialize)]
pub(crate) struct MajorRow {
    pub(crate) id_major: u32,
    pub(crate) major_name: String,
    #[serde(rename = "type")]
    pub(crate) discipline: String,
    pub(crate) id_university: u32,
    pub(crate) capacity: u32,
}

/// Raw row from the universities table.
#[derive(Debug, Deserialize)]
pub(crate) struct UniversityRow {
    pub(crate) id_university: u32,
    pub(crate) university_name: String,
}

pub(crate) fn parse_majors<R: Read>(reader: R) -> Result<Vec<MajorRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize::<MajorRow>().collect()
}

pub(crate) fn parse_universities<R: Read>(reader: R) -> Result<Vec<UniversityRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize::<UniversityRow>().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_major_rows_with_trimmed_fields() {
        let csv = "id_major,major_name,type,id_university,capacity\n\
101, Informatika , Saintek ,1,120\n";
        let rows = parse_majors(Cursor::new(csv)).expect("rows parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id_major, 101);
        assert_eq!(rows[0].major_name, "Informatika");
        assert_eq!(rows[0].discipline, "Saintek");
        assert_eq!(rows[0].capacity, 120);
    }

    #[test]
    fn rejects_non_numeric_capacity() {
        let csv = "id_major,major_name,type,id_university,capacity\n\
101,Informatika,saintek,1,lots\n";
        assert!(parse_majors(Cursor::new(csv)).is_err());
    }

    #[test]
    fn parses_university_rows() {
        let csv = "id_university,university_name\n1,Universitas Indonesia\n";
        let rows = parse_universities(Cursor::new(csv)).expect("rows parse");
        assert_eq!(rows[0].id_university, 1);
        assert_eq!(rows[0].university_name, "Universitas Indonesia");
    }
}
