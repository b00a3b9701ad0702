use crate::models::{GradeRow, ScheduleEvent};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::io::Write;
use std::path::{Path, PathBuf};

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Write grade rows as `assignment,student,grade`.
pub fn write_grade_rows<W: Write>(writer: W, rows: &[GradeRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["assignment", "student", "grade"])
        .context("Failed to write CSV headers")?;

    for row in rows {
        wtr.write_record([
            row.assignment.as_str(),
            row.student.as_str(),
            row.grade.to_string().as_str(),
        ])
        .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Write schedule events; absent instants are left blank.
pub fn write_events<W: Write>(writer: W, events: &[ScheduleEvent]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["title", "start", "end", "status", "color", "remind_at"])
        .context("Failed to write CSV headers")?;

    for event in events {
        wtr.write_record([
            event.title.clone(),
            format_instant(event.start),
            format_instant(event.end),
            event.status.to_string(),
            event.color.to_string(),
            format_instant(event.remind_at),
        ])
        .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Export grade rows to a timestamped CSV file under `dir`.
pub fn export_grades_to_csv(rows: &[GradeRow], dir: &Path) -> Result<PathBuf> {
    let filepath = timestamped_path(dir, "grades");
    let file = std::fs::File::create(&filepath)
        .with_context(|| format!("Failed to create CSV file {}", filepath.display()))?;
    write_grade_rows(file, rows)?;
    Ok(filepath)
}

/// Export schedule events to a timestamped CSV file under `dir`.
pub fn export_events_to_csv(events: &[ScheduleEvent], dir: &Path) -> Result<PathBuf> {
    let filepath = timestamped_path(dir, "events");
    let file = std::fs::File::create(&filepath)
        .with_context(|| format!("Failed to create CSV file {}", filepath.display()))?;
    write_events(file, events)?;
    Ok(filepath)
}

/// Grade lines for the study-suggestion generator. Ungraded rows carry no
/// signal and are left out.
pub fn study_topics(rows: &[GradeRow]) -> Vec<String> {
    rows.iter()
        .filter(|row| row.grade.is_graded())
        .map(|row| format!("{}: {}", row.assignment, row.grade))
        .collect()
}

fn timestamped_path(dir: &Path, prefix: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{}_{}.csv", prefix, timestamp))
}

fn format_instant(instant: Option<NaiveDateTime>) -> String {
    instant
        .map(|at| at.format(INSTANT_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Grade, Status};
    use chrono::NaiveDate;

    fn rows() -> Vec<GradeRow> {
        vec![
            GradeRow {
                assignment: "Essay, draft".to_string(),
                student: "s1".to_string(),
                grade: Grade::Assigned(95.0),
            },
            GradeRow {
                assignment: "Lab".to_string(),
                student: "N/A".to_string(),
                grade: Grade::NotGraded,
            },
        ]
    }

    #[test]
    fn grade_rows_csv() {
        let mut buffer = Vec::new();
        write_grade_rows(&mut buffer, &rows()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "assignment,student,grade\n\"Essay, draft\",s1,95\nLab,N/A,Not Graded\n"
        );
    }

    #[test]
    fn events_csv_leaves_absent_instants_blank() {
        let due = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let events = vec![
            ScheduleEvent::due_marker("Essay", Some(due), Status::Overdue),
            ScheduleEvent::due_marker("Reading", None, Status::NoDueDate),
        ];

        let mut buffer = Vec::new();
        write_events(&mut buffer, &events).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "title,start,end,status,color,remind_at");
        assert_eq!(lines[1], "Essay,2024-01-10T23:59,2024-01-10T23:59,OVERDUE,red,");
        assert_eq!(lines[2], "Reading,,,NO_DUE_DATE,gray,");
    }

    #[test]
    fn study_topics_skip_ungraded() {
        assert_eq!(study_topics(&rows()), vec!["Essay, draft: 95".to_string()]);
    }

    #[test]
    fn export_grades_file() {
        let dir = std::env::temp_dir();
        let filepath = export_grades_to_csv(&rows(), &dir).unwrap();
        assert!(filepath.exists());

        // Clean up
        std::fs::remove_file(filepath).ok();
    }
}
