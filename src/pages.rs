//! Server-side HTML for the lookup form and its result

use crate::models::WeatherRecord;
use crate::web::LookupForm;
use crate::{Result, WeatherError};

const STYLE: &str = "body{font-family:sans-serif;max-width:32rem;margin:2rem auto;padding:0 1rem}\
form{display:flex;gap:.5rem;flex-wrap:wrap}input{padding:.4rem}\
.weather{margin-top:1.5rem;padding:1rem;border:1px solid #ccc;border-radius:.5rem}\
.error{margin-top:1.5rem;color:#a40000}";

/// Render the index page: the form, plus the outcome of a submitted lookup
#[must_use]
pub fn render_index(form: &LookupForm, outcome: Option<&Result<WeatherRecord>>) -> String {
    let body = match outcome {
        None => String::new(),
        Some(Ok(record)) => render_record(record),
        Some(Err(err)) => render_error(err),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>Weather</title><style>{STYLE}</style></head>\n\
         <body>\n\
         <h1>Current weather</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <input name=\"location\" placeholder=\"City\" value=\"{}\" required>\n\
         <input name=\"country\" placeholder=\"Country (optional)\" value=\"{}\">\n\
         <button type=\"submit\">Get weather</button>\n\
         </form>\n\
         {body}\
         </body>\n\
         </html>\n",
        html_escape(&form.location),
        html_escape(form.country.as_deref().unwrap_or_default()),
    )
}

fn render_record(record: &WeatherRecord) -> String {
    format!(
        "<section class=\"weather\">\n\
         <h2>{}</h2>\n\
         <img src=\"{}\" alt=\"{}\">\n\
         <p class=\"temperature\">{}</p>\n\
         <p class=\"description\">{}</p>\n\
         <p class=\"humidity\">Humidity: {}</p>\n\
         <p class=\"coordinates\">{:.4}, {:.4} &middot; observed {}</p>\n\
         </section>\n",
        html_escape(&record.location),
        html_escape(&record.icon_url()),
        html_escape(&record.condition),
        record.format_temperature(),
        html_escape(&record.format_description()),
        record.format_humidity(),
        record.latitude,
        record.longitude,
        record.observed_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

fn render_error(err: &WeatherError) -> String {
    format!(
        "<p class=\"error\" data-kind=\"{}\">{}</p>\n",
        err.kind(),
        html_escape(&err.user_message())
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
