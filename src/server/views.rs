//! Server-rendered HTML pages

use crate::booking::{fields, BookingRecord, MARKET_SEGMENTS, MEAL_PLANS, ROOM_TYPES};
use crate::dataset::DatasetPreview;
use crate::inference::PredictionOutcome;
use crate::samples::SampleCase;

/// What the result panel below the form shows
pub enum Panel<'a> {
    Empty,
    Outcome(&'a PredictionOutcome),
    Error(&'a str),
}

/// Everything the form page renders
pub struct FormPage<'a> {
    pub record: &'a BookingRecord,
    pub panel: Panel<'a>,
    pub disabled_reason: Option<&'a str>,
    pub samples: &'a [SampleCase],
    pub preview: Option<&'a DatasetPreview>,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn number_input(name: &str, label: &str, value: &str, step: &str) -> String {
    format!(
        r#"<label class="block"><span class="text-sm text-gray-300">{label}</span>
<input type="number" min="0" step="{step}" name="{name}" value="{value}" required class="mt-1 w-full rounded bg-gray-700 px-3 py-2"></label>"#,
        label = escape_html(label),
        step = step,
        name = name,
        value = escape_html(value),
    )
}

fn select_input(name: &str, label: &str, options: &[&str], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|option| {
            format!(
                r#"<option value="{v}"{sel}>{v}</option>"#,
                v = escape_html(option),
                sel = if *option == selected { " selected" } else { "" }
            )
        })
        .collect();
    format!(
        r#"<label class="block"><span class="text-sm text-gray-300">{label}</span>
<select name="{name}" class="mt-1 w-full rounded bg-gray-700 px-3 py-2">{options}</select></label>"#,
        label = escape_html(label),
        name = name,
        options = options,
    )
}

fn form_fields(record: &BookingRecord) -> String {
    [
        number_input(fields::LEAD_TIME, "Lead time (days)", &record.lead_time.to_string(), "1"),
        number_input(fields::NO_OF_ADULTS, "Adults", &record.no_of_adults.to_string(), "1"),
        number_input(fields::NO_OF_CHILDREN, "Children", &record.no_of_children.to_string(), "1"),
        number_input(
            fields::NO_OF_WEEKEND_NIGHTS,
            "Weekend nights",
            &record.no_of_weekend_nights.to_string(),
            "1",
        ),
        number_input(fields::NO_OF_WEEK_NIGHTS, "Week nights", &record.no_of_week_nights.to_string(), "1"),
        select_input(fields::TYPE_OF_MEAL_PLAN, "Meal plan", &MEAL_PLANS, &record.type_of_meal_plan),
        select_input(fields::ROOM_TYPE_RESERVED, "Room type", &ROOM_TYPES, &record.room_type_reserved),
        select_input(
            fields::MARKET_SEGMENT_TYPE,
            "Market segment",
            &MARKET_SEGMENTS,
            &record.market_segment_type,
        ),
        select_input(
            fields::REQUIRED_CAR_PARKING_SPACE,
            "Needs parking?",
            &["0", "1"],
            &record.required_car_parking_space.to_string(),
        ),
        select_input(
            fields::REPEATED_GUEST,
            "Repeated guest?",
            &["0", "1"],
            &record.repeated_guest.to_string(),
        ),
        number_input(
            fields::NO_OF_PREVIOUS_CANCELLATIONS,
            "Previous cancellations",
            &record.no_of_previous_cancellations.to_string(),
            "1",
        ),
        number_input(
            fields::NO_OF_PREVIOUS_BOOKINGS_NOT_CANCELED,
            "Previous bookings kept",
            &record.no_of_previous_bookings_not_canceled.to_string(),
            "1",
        ),
        number_input(
            fields::AVG_PRICE_PER_ROOM,
            "Average room price",
            &record.avg_price_per_room.to_string(),
            "0.01",
        ),
        number_input(
            fields::NO_OF_SPECIAL_REQUESTS,
            "Special requests",
            &record.no_of_special_requests.to_string(),
            "1",
        ),
    ]
    .join("\n")
}

fn outcome_panel(outcome: &PredictionOutcome) -> String {
    let (colour, headline) = if outcome.label.is_cancelled() {
        ("border-red-500", "Booking likely to be cancelled")
    } else {
        ("border-green-500", "Booking likely to be kept")
    };
    let probability = outcome
        .probability
        .map(|p| format!(r#"<p class="mt-1">Cancellation probability: <strong>{:.1}%</strong></p>"#, p * 100.0))
        .unwrap_or_default();
    let rows: String = outcome
        .record
        .entries()
        .into_iter()
        .map(|(name, value)| {
            format!(
                "<tr><td class=\"pr-4 text-gray-400\">{}</td><td>{}</td></tr>",
                name,
                escape_html(&value)
            )
        })
        .collect();
    format!(
        r#"<section id="result" class="mt-6 rounded border-l-4 {colour} bg-gray-800 p-4">
<h2 class="text-lg font-semibold">Prediction: {label}</h2>
<p>{headline}</p>{probability}
<details class="mt-3"><summary class="cursor-pointer text-sm text-gray-400">Input used</summary>
<table class="mt-2 text-sm">{rows}</table></details>
</section>"#,
        colour = colour,
        label = outcome.label,
        headline = headline,
        probability = probability,
        rows = rows,
    )
}

fn error_panel(message: &str) -> String {
    format!(
        r#"<section id="error" class="mt-6 rounded border-l-4 border-yellow-500 bg-gray-800 p-4">
<h2 class="text-lg font-semibold">Prediction failed</h2><p>{}</p></section>"#,
        escape_html(message)
    )
}

fn preview_table(preview: &DatasetPreview) -> String {
    let header: String = preview
        .columns
        .iter()
        .map(|c| format!("<th class=\"px-2 text-left\">{}</th>", escape_html(&c.name)))
        .collect();
    let body: String = preview
        .row_cells()
        .into_iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|cell| format!("<td class=\"px-2\">{}</td>", escape_html(cell)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        r#"<details class="mt-8"><summary class="cursor-pointer">Reference dataset ({shown} of {total} rows)</summary>
<div class="overflow-x-auto"><table class="mt-2 text-xs"><thead><tr>{header}</tr></thead><tbody>{body}</tbody></table></div></details>"#,
        shown = preview.rows,
        total = preview.total_rows,
        header = header,
        body = body,
    )
}

pub fn render_form_page(page: &FormPage<'_>) -> String {
    let banner = page
        .disabled_reason
        .map(|reason| {
            format!(
                r#"<div id="disabled" class="mb-6 rounded bg-red-900 p-4">Prediction is unavailable: {}</div>"#,
                escape_html(reason)
            )
        })
        .unwrap_or_default();
    let samples: String = page
        .samples
        .iter()
        .map(|case| {
            format!(
                r#"<a href="/samples/{name}" title="{description}" class="rounded bg-gray-700 px-3 py-1 text-sm hover:bg-gray-600">{title}</a>"#,
                name = escape_html(case.name),
                description = escape_html(case.description),
                title = escape_html(case.title),
            )
        })
        .collect::<Vec<_>>()
        .join(" ");
    let panel = match page.panel {
        Panel::Empty => String::new(),
        Panel::Outcome(outcome) => outcome_panel(outcome),
        Panel::Error(message) => error_panel(message),
    };
    let preview = page.preview.map(preview_table).unwrap_or_default();
    let submit_state = if page.disabled_reason.is_some() { " disabled" } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Hotel booking cancellation predictor</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen">
<main class="mx-auto max-w-3xl px-6 py-8">
<h1 class="mb-6 text-2xl font-bold">Hotel booking cancellation predictor</h1>
{banner}
<div class="mb-4 flex flex-wrap gap-2"><span class="text-sm text-gray-400">Sample cases:</span> {samples}</div>
<form method="post" action="/predict" class="grid grid-cols-1 gap-4 md:grid-cols-2">
{fields}
<div class="md:col-span-2"><button type="submit"{submit_state} class="rounded bg-blue-600 px-4 py-2 font-semibold hover:bg-blue-500">Predict</button></div>
</form>
{panel}
{preview}
</main>
</body>
</html>"#,
        banner = banner,
        samples = samples,
        fields = form_fields(page.record),
        submit_state = submit_state,
        panel = panel,
        preview = preview,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::CancellationLabel;

    fn page<'a>(record: &'a BookingRecord, panel: Panel<'a>) -> String {
        render_form_page(&FormPage {
            record,
            panel,
            disabled_reason: None,
            samples: &[],
            preview: None,
        })
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_form_preselects_record_values() {
        let record = BookingRecord {
            market_segment_type: "Corporate".to_string(),
            ..Default::default()
        };
        let html = page(&record, Panel::Empty);
        assert!(html.contains(r#"<option value="Corporate" selected>"#));
        assert!(html.contains(r#"name="avg_price_per_room" value="100""#));
        assert!(!html.contains(r#"id="result""#));
    }

    #[test]
    fn test_outcome_panel() {
        let record = BookingRecord::default();
        let outcome = PredictionOutcome {
            label: CancellationLabel::Cancelled,
            probability: Some(0.625),
            record: record.clone(),
            features: Vec::new(),
        };
        let html = page(&record, Panel::Outcome(&outcome));
        assert!(html.contains("Prediction: cancelled"));
        assert!(html.contains("62.5%"));
    }

    #[test]
    fn test_error_panel_escaped() {
        let html = page(&BookingRecord::default(), Panel::Error("unknown category '<b>'"));
        assert!(html.contains("unknown category &#39;&lt;b&gt;&#39;"));
    }

    #[test]
    fn test_disabled_banner() {
        let html = render_form_page(&FormPage {
            record: &BookingRecord::default(),
            panel: Panel::Empty,
            disabled_reason: Some("model.json: missing"),
            samples: &[],
            preview: None,
        });
        assert!(html.contains(r#"id="disabled""#));
        assert!(html.contains(r#"type="submit" disabled"#));
    }
}
