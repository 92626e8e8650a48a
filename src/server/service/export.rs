//! Spreadsheet and printable exports of list endpoints.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use rust_xlsxwriter::{Format, Workbook};

use crate::server::error::Error;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Sheet names are limited to 31 characters by the file format
const MAX_SHEET_NAME_LEN: usize = 31;
const MIN_COLUMN_WIDTH: f64 = 8.0;
const MAX_COLUMN_WIDTH: f64 = 60.0;

// Landscape A4, all lengths in millimetres
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const PAGE_MARGIN: f32 = 10.0;
const TITLE_HEIGHT: f32 = 12.0;
const LINE_HEIGHT: f32 = 5.0;
const CELL_PADDING: f32 = 1.0;
const LAYER_NAME: &str = "Table";

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 9.0;

const MM_PER_PT: f32 = 0.3528;
/// Average Helvetica glyph width relative to the font size
const AVERAGE_GLYPH_WIDTH: f32 = 0.55;

/// A generated file ready to be downloaded
#[derive(Debug)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
}

impl ExportFormat {
    /// Reads the `format` query value, `excel` or `pdf`
    pub fn parse(format: Option<&str>) -> Result<Self, Error> {
        match format.map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("excel") => Ok(Self::Excel),
            Some(format) if format.eq_ignore_ascii_case("pdf") => Ok(Self::Pdf),
            Some(format) => Err(Error::Validation(format!(
                "format {} is not supported",
                format
            ))),
            None => Err(Error::Validation("format is required".to_string())),
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Excel => XLSX_CONTENT_TYPE,
            Self::Pdf => PDF_CONTENT_TYPE,
        }
    }
}

/// Spreadsheet-only exports
pub fn ensure_excel(format: Option<&str>) -> Result<(), Error> {
    match ExportFormat::parse(format)? {
        ExportFormat::Excel => Ok(()),
        ExportFormat::Pdf => Err(Error::Validation("format pdf is not supported".to_string())),
    }
}

/// A table that can be downloaded as a spreadsheet or a printable document
pub struct Report<'a> {
    /// Heading printed above the table
    pub title: String,
    pub sheet_name: &'a str,
    pub headers: &'a [&'a str],
    /// Column widths of the printable document, in millimetres
    pub column_widths: &'a [f32],
    pub rows: Vec<Vec<String>>,
}

impl Report<'_> {
    /// Renders the report into `{file_stem}.xlsx` or `{file_stem}.pdf`
    pub fn export(&self, format: ExportFormat, file_stem: &str) -> Result<ExportFile, Error> {
        let bytes = match format {
            ExportFormat::Excel => build_sheet(self.sheet_name, self.headers, &self.rows)?,
            ExportFormat::Pdf => {
                build_pdf(&self.title, self.headers, self.column_widths, &self.rows)?
            }
        };

        Ok(ExportFile {
            file_name: format!("{}.{}", file_stem, format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }
}

fn sheet_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '[' | ']' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

/// Writes a single sheet with a bold header row and one row per record.
///
/// Columns are sized to their longest value.
pub fn build_sheet(name: &str, headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, Error> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(name))?;

    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (index, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet.write_string(index as u32 + 1, col as u16, value)?;

            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(value.chars().count());
            }
        }
    }
    for (col, width) in widths.into_iter().enumerate() {
        let width = (width as f64 * 1.2 + 2.0).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet.set_column_width(col as u16, width)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn pdf_error(err: impl std::fmt::Display) -> Error {
    Error::PdfError(err.to_string())
}

/// Splits a cell value into lines that fit the column.
///
/// Words longer than a line, such as links, are cut at the column edge.
fn wrap_text(text: &str, width: f32, font_size: f32) -> Vec<String> {
    let glyph_width = font_size * MM_PER_PT * AVERAGE_GLYPH_WIDTH;
    let max_chars = (((width - 2.0 * CELL_PADDING) / glyph_width).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn row_height(cells: &[Vec<String>]) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);

    lines as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING
}

fn cell_border(x: f32, y: f32, width: f32, height: f32) -> Line {
    let corners = [
        (x, y),
        (x + width, y),
        (x + width, y + height),
        (x, y + height),
    ];

    Line {
        points: corners
            .into_iter()
            .map(|(x, y)| (Point::new(Mm(x), Mm(y)), false))
            .collect(),
        is_closed: true,
    }
}

/// Draws one bordered row whose top edge sits at `top`, returning the next row's top
fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    font_size: f32,
    widths: &[f32],
    cells: &[Vec<String>],
    top: f32,
) -> f32 {
    let height = row_height(cells);

    let mut x = PAGE_MARGIN;
    for (width, lines) in widths.iter().zip(cells) {
        layer.add_line(cell_border(x, top - height, *width, height));

        for (index, line) in lines.iter().enumerate() {
            let baseline = top - CELL_PADDING - (index as f32 + 1.0) * LINE_HEIGHT + 1.2;
            layer.use_text(
                line.as_str(),
                font_size,
                Mm(x + CELL_PADDING),
                Mm(baseline),
                font,
            );
        }
        x += width;
    }

    top - height
}

fn wrap_row<S: AsRef<str>>(values: &[S], widths: &[f32], font_size: f32) -> Vec<Vec<String>> {
    widths
        .iter()
        .zip(values)
        .map(|(width, value)| wrap_text(value.as_ref(), *width, font_size))
        .collect()
}

/// Lays the rows out as a bordered table on landscape A4 pages.
///
/// The header row is repeated at the top of every page.
pub fn build_pdf(
    title: &str,
    headers: &[&str],
    widths: &[f32],
    rows: &[Vec<String>],
) -> Result<Vec<u8>, Error> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let header = wrap_row(headers, widths, HEADER_SIZE);
    let mut layer = doc.get_page(page).get_layer(layer);
    let mut top = PAGE_HEIGHT - PAGE_MARGIN;

    layer.use_text(title, TITLE_SIZE, Mm(PAGE_MARGIN), Mm(top - 7.0), &bold);
    top -= TITLE_HEIGHT;
    top = draw_row(&layer, &bold, HEADER_SIZE, widths, &header, top);

    for row in rows {
        let cells = wrap_row(row.as_slice(), widths, BODY_SIZE);

        if top - row_height(&cells) < PAGE_MARGIN {
            let (page, index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
            layer = doc.get_page(page).get_layer(index);
            top = draw_row(
                &layer,
                &bold,
                HEADER_SIZE,
                widths,
                &header,
                PAGE_HEIGHT - PAGE_MARGIN,
            );
        }
        top = draw_row(&layer, &regular, BODY_SIZE, widths, &cells, top);
    }

    doc.save_to_bytes().map_err(pdf_error)
}
