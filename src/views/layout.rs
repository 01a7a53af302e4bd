use maud::{html, Markup, DOCTYPE};

fn css() -> Markup {
    html! {
        style {
            "body{font-family:system-ui,sans-serif;max-width:72rem;margin:2rem auto;padding:0 1rem;color:#111827}"
            "table{border-collapse:collapse;width:100%}"
            "th,td{border:1px solid #e5e7eb;padding:.5rem .75rem;text-align:left;vertical-align:top}"
            "th{background:#f3f4f6;font-size:.75rem;text-transform:uppercase}"
            ".notice{padding:.75rem 1rem;border-radius:.375rem;margin-bottom:1rem}"
            ".success{background:#dcfce7;color:#166534}"
            ".warning{background:#fef9c3;color:#854d0e}"
            ".correct{font-weight:600;color:#15803d}"
            ".badge{display:inline-block;padding:.1rem .5rem;border-radius:9999px;font-size:.75rem;background:#dbeafe;color:#1e40af}"
        }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                (css())
                title { (title) " - Question Bank" }
            }
            body {
                main { (body) }
            }
        }
    }
}
