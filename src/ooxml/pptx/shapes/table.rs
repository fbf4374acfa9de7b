/// DrawingML table (`a:tbl`) hosted by a graphic frame.
use crate::common::xml::find_attr;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::shapes::textframe::{Paragraph, ParagraphCollector};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Rows of a table with their cells' text.
///
/// Merged cells keep their `a:tc` placeholders, so every row of a
/// well-formed table has the same number of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<TableRow>,
    first_row: bool,
    column_widths: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    paragraphs: Vec<Paragraph>,
}

impl TableCell {
    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TableRow {
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }
}

impl Table {
    /// Read the table of a `p:graphicFrame`; `Ok(None)` when the frame
    /// hosts something else (chart, diagram, OLE object).
    pub fn from_graphic_frame_xml(xml: &[u8]) -> Result<Option<Self>> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut table: Option<Table> = None;
        let mut cell: Option<ParagraphCollector> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| OoxmlError::xml("table", e))?;
            match &event {
                Event::Start(e) if e.local_name().as_ref() == b"tbl" => {
                    table = Some(Table::default());
                },
                Event::End(e) if e.local_name().as_ref() == b"tbl" => break,
                Event::Eof => break,
                _ if table.is_none() => {},
                Event::Start(e) | Event::Empty(e) if cell.is_none() => {
                    if let Some(table) = table.as_mut() {
                        match e.local_name().as_ref() {
                            b"tblPr" => {
                                table.first_row = matches!(
                                    find_attr(e, b"firstRow").as_deref(),
                                    Some("1" | "true")
                                );
                            },
                            b"gridCol" => {
                                let w = find_attr(e, b"w")
                                    .and_then(|v| v.parse().ok())
                                    .unwrap_or(0);
                                table.column_widths.push(w);
                            },
                            b"tr" => table.rows.push(TableRow::default()),
                            b"tc" if matches!(event, Event::Empty(_)) => {
                                if let Some(row) = table.rows.last_mut() {
                                    row.cells.push(TableCell::default());
                                }
                            },
                            b"tc" => cell = Some(ParagraphCollector::default()),
                            _ => {},
                        }
                    }
                },
                Event::End(e) if e.local_name().as_ref() == b"tc" => {
                    if let (Some(collector), Some(table)) = (cell.take(), table.as_mut()) {
                        if let Some(row) = table.rows.last_mut() {
                            row.cells.push(TableCell {
                                paragraphs: collector.finish(),
                            });
                        }
                    }
                },
                other => {
                    if let Some(collector) = cell.as_mut() {
                        collector.handle(other);
                    }
                },
            }
            buf.clear();
        }

        Ok(table)
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// `a:tblPr/@firstRow`: the first row is styled as a header.
    pub fn has_header_row(&self) -> bool {
        self.first_row
    }

    /// `a:gridCol/@w` values in EMU.
    pub fn column_widths(&self) -> &[i64] {
        &self.column_widths
    }

    pub fn is_rectangular(&self) -> bool {
        let cols = self.column_count();
        self.rows.iter().all(|r| r.cells.len() == cols)
    }

    /// Cell text grid.
    pub fn text_grid(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(TableCell::text).collect())
            .collect()
    }
}
