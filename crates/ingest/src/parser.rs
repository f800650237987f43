//! Problemset listing HTML → [`ParsedTask`]s.
//!
//! Expected markup, one row per problem:
//!
//! ```html
//! <table class="problems">
//!   <tr>
//!     <td class="id"><a href="/problemset/problem/4/A">4A</a></td>
//!     <td>
//!       <div><a href="/problemset/problem/4/A">Watermelon</a></div>
//!       <div><a class="notice" href="/problemset?tags=math">math</a>, ...</div>
//!     </td>
//!     <td class="act">...</td>
//!     <td><span class="ProblemRating">800</span></td>
//!     <td><a href="/problemset/status/4/problem/A">x412345</a></td>
//!   </tr>
//! </table>
//! ```

use {
    cfbot_catalog::ParsedTask,
    scraper::{ElementRef, Html, Selector},
    tracing::debug,
};

use crate::{Error, Result};

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::parse(format!("invalid selector '{css}': {e:?}")))
}

/// Element text with whitespace runs collapsed to single spaces.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"x412345"` → `412345`.
fn parse_solved(text: &str) -> Option<i64> {
    text.trim().strip_prefix('x')?.parse().ok()
}

/// Highest page index in the pagination block. `1` when there is none.
pub fn parse_page_count(html: &str) -> Result<u32> {
    let document = Html::parse_document(html);
    let index_sel = selector("div.pagination span.page-index")?;

    let count = document
        .select(&index_sel)
        .filter_map(|el| {
            el.value()
                .attr("pageindex")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .or_else(|| text_of(el).parse().ok())
        })
        .max()
        .unwrap_or(1);
    Ok(count.max(1))
}

/// Every problem row on a listing page, in page order.
///
/// Rows without a number or a name (headers, footers) are skipped. A missing
/// rating or solved count becomes `0`.
pub fn parse_tasks(html: &str) -> Result<Vec<ParsedTask>> {
    let document = Html::parse_document(html);
    let row_sel = selector("table.problems tr")?;
    let cell_sel = selector("td")?;
    let link_sel = selector("a")?;
    let tag_sel = selector("a.notice")?;
    let rating_sel = selector("span.ProblemRating")?;

    let mut tasks = Vec::new();
    for row in document.select(&row_sel) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }

        let number = text_of(cells[0]);
        let name = cells[1]
            .select(&link_sel)
            .next()
            .map(text_of)
            .unwrap_or_default();
        if number.is_empty() || name.is_empty() {
            continue;
        }

        let mut categories: Vec<String> = Vec::new();
        for tag in cells[1].select(&tag_sel).map(text_of) {
            if !tag.is_empty() && !categories.contains(&tag) {
                categories.push(tag);
            }
        }

        let difficulty = row
            .select(&rating_sel)
            .next()
            .and_then(|el| text_of(el).parse().ok())
            .unwrap_or(0);
        let solved_count = cells[2..]
            .iter()
            .find_map(|cell| parse_solved(&text_of(*cell)))
            .unwrap_or(0);

        tasks.push(ParsedTask {
            number,
            name,
            categories,
            difficulty,
            solved_count,
        });
    }

    debug!(count = tasks.len(), "problemset rows parsed");
    Ok(tasks)
}
