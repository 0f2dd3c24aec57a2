//! Sales report downloads.
//!
//! Both formats carry the same four columns: date, order reference, customer
//! and total amount.

use std::path::Path;

use genpdf::{Alignment, Element, elements, style};
use thiserror::Error;

use crate::domain::report::{DATE_FORMAT, DateRange, SalesReport};

const REPORT_TITLE: &str = "Sales Report";
const COLUMNS: [&str; 4] = ["Date", "Order ID", "Customer", "Total Amount"];
/// Font family expected in the fonts directory, e.g. `Roboto-Regular.ttf`.
const FONT_FAMILY: &str = "Roboto";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to load fonts from `{0}`")]
    Fonts(String),
    #[error("failed to render pdf: {0}")]
    Pdf(#[from] genpdf::error::Error),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] std::io::Error),
}

/// Download format requested by the report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    /// Spreadsheet download, written as CSV.
    Excel,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "excel" => Some(Self::Excel),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "csv",
        }
    }
}

/// Rendered download ready to be streamed to the client.
#[derive(Debug)]
pub struct ExportedReport {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

fn period_label(range: &DateRange) -> String {
    format!(
        "{} to {}",
        range.start.format(DATE_FORMAT),
        range.end.format(DATE_FORMAT)
    )
}

/// Render `report` for `range` in the requested format.
pub fn export_report(
    format: ExportFormat,
    report: &SalesReport,
    range: &DateRange,
    fonts_dir: &Path,
) -> Result<ExportedReport, ExportError> {
    let bytes = match format {
        ExportFormat::Pdf => render_pdf(report, range, fonts_dir)?,
        ExportFormat::Excel => render_csv(report)?,
    };

    Ok(ExportedReport {
        bytes,
        content_type: format.content_type(),
        file_name: format!(
            "sales-report-{}-{}.{}",
            range.start.format(DATE_FORMAT),
            range.end.format(DATE_FORMAT),
            format.extension()
        ),
    })
}

pub fn render_csv(report: &SalesReport) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;

    for row in &report.orders {
        let total = row.total_amount.to_string();
        writer.write_record([
            row.date.as_str(),
            row.order_id.as_str(),
            row.customer_name.as_str(),
            total.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

/// Render the report as an A4 PDF.
///
/// `fonts_dir` must hold `Roboto-Regular.ttf`, `Roboto-Bold.ttf`,
/// `Roboto-Italic.ttf` and `Roboto-BoldItalic.ttf`. No fonts ship with the
/// crate; a missing file yields [`ExportError::Fonts`].
pub fn render_pdf(
    report: &SalesReport,
    range: &DateRange,
    fonts_dir: &Path,
) -> Result<Vec<u8>, ExportError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, FONT_FAMILY, None)
        .map_err(|_| ExportError::Fonts(fonts_dir.display().to_string()))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(REPORT_TITLE);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(
        elements::Paragraph::new(REPORT_TITLE)
            .aligned(Alignment::Center)
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    doc.push(
        elements::Paragraph::new(period_label(range))
            .aligned(Alignment::Center)
            .styled(style::Style::new().with_font_size(10)),
    );
    doc.push(elements::Break::new(1.5));

    let mut table = elements::TableLayout::new(vec![2, 2, 3, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold();
    let mut header = table.row();
    for column in COLUMNS {
        header.push_element(elements::Paragraph::new(column).styled(bold));
    }
    header.push()?;

    for row in &report.orders {
        table
            .row()
            .element(elements::Paragraph::new(row.date.as_str()))
            .element(elements::Paragraph::new(row.order_id.as_str()))
            .element(elements::Paragraph::new(row.customer_name.as_str()))
            .element(elements::Paragraph::new(row.total_amount.to_string()).aligned(Alignment::Right))
            .push()?;
    }

    doc.push(table);
    doc.push(elements::Break::new(1));
    doc.push(
        elements::Paragraph::new(format!(
            "Orders: {}  Total: {}  Discounts: {}",
            report.summary.overall_sales_count,
            report.summary.overall_order_amount,
            report.summary.overall_discount
        ))
        .aligned(Alignment::Right)
        .styled(bold),
    );

    let mut buffer = Vec::new();
    doc.render(&mut buffer)?;
    Ok(buffer)
}
