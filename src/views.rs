//! Server-rendered HTML pages.

use std::fmt::Write;

use crate::handlers::dashboard::Dashboard;
use crate::models::entry::Mood;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body>
<header><h1>PancrePal</h1><nav><a href="/">Dashboard</a> · <a href="/privacy">Privacy</a></nav></header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

fn mood_options(selected: Mood) -> String {
    Mood::ALL
        .iter()
        .map(|mood| {
            let label = match mood {
                Mood::Unset => "—",
                other => other.symbol(),
            };
            let sel = if *mood == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{sel}>{label}</option>"#, mood.as_str())
        })
        .collect()
}

fn opt(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

pub fn dashboard_page(dashboard: &Dashboard, flash: Option<&str>) -> String {
    let mut body = String::new();

    if let Some(message) = flash {
        let _ = write!(body, r#"<p class="flash error">{}</p>"#, escape(message));
    }

    let _ = write!(
        body,
        r#"<section class="avatar"><span class="avatar-symbol">{}</span> <span class="avatar-message">{}</span></section>"#,
        dashboard.avatar.symbol,
        escape(dashboard.avatar.message),
    );

    let _ = write!(
        body,
        r#"<section><h2>New reading</h2>
<form method="post" action="/entries">
<input name="glucose" type="number" step="0.1" placeholder="mmol/L" required>
<input name="meal" placeholder="Meal">
<select name="mood">{moods}</select>
<input name="time_of_day" placeholder="Breakfast, Lunch…">
<button type="submit">Log</button>
</form></section>"#,
        moods = mood_options(Mood::Unset),
    );

    body.push_str("<section><h2>Presets</h2><ul>");
    for preset in &dashboard.presets {
        let glucose = preset
            .default_glucose
            .map(|g| format!("{g:.1}"))
            .unwrap_or_default();
        let _ = write!(
            body,
            r#"<li>{name} {glucose} {mood} {time}
<form method="post" action="/presets/{id}/use"><input name="glucose" type="number" step="0.1" placeholder="{glucose}"><button>Use</button></form>
<form method="post" action="/presets/{id}/delete"><button>Delete</button></form></li>"#,
            id = preset.id,
            name = escape(&preset.name),
            mood = preset.default_mood.symbol(),
            time = opt(&preset.default_time_of_day),
        );
    }
    let _ = write!(
        body,
        r#"</ul>
<form method="post" action="/presets">
<input name="name" placeholder="Preset name" required>
<input name="default_glucose" type="number" step="0.1" placeholder="Glucose">
<select name="default_mood">{moods}</select>
<input name="default_time_of_day" placeholder="Time of day">
<button type="submit">Add preset</button>
</form></section>"#,
        moods = mood_options(Mood::Unset),
    );

    // serde_json renders gaps as `null`, which Chart.js draws as breaks.
    let labels = serde_json::to_string(&dashboard.chart.labels).unwrap_or_else(|_| "[]".into());
    let values = serde_json::to_string(&dashboard.chart.values).unwrap_or_else(|_| "[]".into());
    let _ = write!(
        body,
        r#"<section><h2>Last 7 days</h2><canvas id="glucoseChart"></canvas>
<script>
new Chart(document.getElementById("glucoseChart"), {{
  type: "line",
  data: {{ labels: {labels}, datasets: [{{ label: "Average glucose", data: {values}, spanGaps: false }}] }}
}});
</script></section>"#,
    );

    body.push_str(concat!(
        "<section><h2>Recent entries</h2><table><thead><tr>",
        "<th>When</th><th>Glucose</th><th>Meal</th><th>Mood</th><th>Time of day</th><th></th>",
        "</tr></thead><tbody>",
    ));
    for entry in &dashboard.entries {
        let _ = write!(
            body,
            r#"<tr><td>{when}</td><td>{glucose:.1}</td><td>{meal}</td><td>{mood}</td><td>{time}</td>
<td><form method="post" action="/entries/{id}/delete"><button>Delete</button></form></td></tr>"#,
            id = entry.id,
            when = escape(&entry.noted_at),
            glucose = entry.glucose,
            meal = opt(&entry.meal),
            mood = entry.mood.symbol(),
            time = opt(&entry.time_of_day),
        );
    }
    body.push_str("</tbody></table></section>");

    layout("PancrePal", &body)
}

pub fn privacy_page() -> String {
    layout(
        "Privacy · PancrePal",
        r#"<h2>Privacy &amp; ethics</h2>
<p>PancrePal is a personal logging tool. Readings, meals and moods you enter stay in the
database this app is configured with and are never sent anywhere else.</p>
<p>It is not a medical device. Averages and avatar messages are encouragement, not advice;
talk to your care team about your readings.</p>
<p>There are no accounts and no tracking. Deleting an entry or preset removes it permanently.</p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_metacharacters() {
        assert_eq!(
            escape(r#"<b>"Fish" & 'chips'</b>"#),
            "&lt;b&gt;&quot;Fish&quot; &amp; &#39;chips&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("Porridge"), "Porridge");
    }

    #[test]
    fn test_privacy_page_is_complete_document() {
        let page = privacy_page();
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("Privacy &amp; ethics"));
    }
}
