//! Pure HTML rendering of the catalog page. No I/O happens here; the page is
//! a function of the mutation feedback and the current record list.

use std::fmt::Write as _;

use tankbase_dal::tank::Tank;

use super::{Feedback, CLASSES, NATIONS};

pub fn page(feedback: &Feedback, tanks: &[Tank]) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(
        "<!doctype html>\n<html lang=\"ru\">\n<head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Танковая база</title>\n\
         <link rel=\"stylesheet\" href=\"/styles.css\">\n\
         </head>\n<body>\n<h1>Танковая база</h1>\n",
    );
    feedback_block(&mut html, feedback);
    create_form(&mut html);
    listing(&mut html, tanks);
    html.push_str("</body>\n</html>\n");
    html
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn feedback_block(html: &mut String, feedback: &Feedback) {
    match feedback {
        Feedback::None => {}
        Feedback::Notice(notice) => {
            let _ = writeln!(
                html,
                "<div class=\"card notice\">✅ {}</div>",
                escape(notice)
            );
        }
        Feedback::Errors(errors) => {
            html.push_str("<div class=\"card errors\">\n");
            for error in errors {
                let _ = writeln!(html, "<div>⚠️ {}</div>", escape(&error.to_string()));
            }
            html.push_str("</div>\n");
        }
    }
}

fn options(html: &mut String, values: &[&str], selected: Option<&str>) {
    for value in values {
        let marker = if Some(*value) == selected {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape(value),
            marker
        );
    }
}

fn create_form(html: &mut String) {
    html.push_str(
        "<div class=\"card\">\n<h2>Добавить танк</h2>\n\
         <form method=\"post\">\n\
         <input type=\"hidden\" name=\"action\" value=\"create\">\n\
         <label>Название <input name=\"name\" placeholder=\"Т-90М\" required></label>\n\
         <label>Страна <select name=\"nation\">",
    );
    options(html, NATIONS, None);
    html.push_str("</select></label>\n<label>Класс <select name=\"class\">");
    options(html, CLASSES, None);
    html.push_str(
        "</select></label>\n\
         <label>Год <input name=\"year\" type=\"number\" min=\"1900\" max=\"2100\" placeholder=\"2020\"></label>\n\
         <label>Описание <textarea name=\"description\" rows=\"3\" placeholder=\"Коротко о машине\"></textarea></label>\n\
         <button type=\"submit\">Сохранить</button>\n\
         </form>\n</div>\n",
    );
}

fn listing(html: &mut String, tanks: &[Tank]) {
    html.push_str("<div class=\"card\">\n<h2>Список</h2>\n");
    if tanks.is_empty() {
        html.push_str("<p class=\"muted\">Пока пусто. Добавьте первый танк.</p>\n");
    } else {
        html.push_str(
            "<table>\n<thead>\n<tr>\
             <th>#</th><th>Название</th><th>Страна</th><th>Класс</th>\
             <th>Год</th><th>Описание</th><th>Действия</th>\
             </tr>\n</thead>\n<tbody>\n",
        );
        for tank in tanks {
            row(html, tank);
        }
        html.push_str("</tbody>\n</table>\n");
    }
    html.push_str("</div>\n");
}

/// One editable table row. The inputs live outside the per-row form and are
/// bound to it through the `form` attribute, so every row submits
/// independently to the same endpoint.
fn row(html: &mut String, tank: &Tank) {
    let id = tank.id;
    let year = tank.year.map(|y| y.to_string()).unwrap_or_default();
    let description = tank.description.as_deref().unwrap_or_default();

    html.push_str("<tr>\n");
    let _ = writeln!(html, "<td>{}</td>", id);
    let _ = writeln!(
        html,
        "<td><input form=\"edit-{}\" name=\"name\" value=\"{}\"></td>",
        id,
        escape(&tank.name)
    );

    let _ = write!(html, "<td><select form=\"edit-{}\" name=\"nation\">", id);
    options(html, NATIONS, Some(&tank.nation));
    html.push_str("</select></td>\n");

    let _ = write!(html, "<td><select form=\"edit-{}\" name=\"class\">", id);
    options(html, CLASSES, Some(&tank.class));
    html.push_str("</select></td>\n");

    let _ = writeln!(
        html,
        "<td><input form=\"edit-{}\" name=\"year\" type=\"number\" min=\"1900\" max=\"2100\" value=\"{}\"></td>",
        id,
        escape(&year)
    );
    let _ = writeln!(
        html,
        "<td><textarea form=\"edit-{}\" name=\"description\" rows=\"2\">{}</textarea></td>",
        id,
        escape(description)
    );

    html.push_str("<td><div class=\"actions\">\n");
    let _ = writeln!(
        html,
        "<form id=\"edit-{0}\" method=\"post\">\
         <input type=\"hidden\" name=\"action\" value=\"update\">\
         <input type=\"hidden\" name=\"id\" value=\"{0}\">\
         <button type=\"submit\">Обновить</button></form>",
        id
    );
    let _ = writeln!(
        html,
        "<form method=\"post\" onsubmit=\"return confirm('Удалить запись?');\">\
         <input type=\"hidden\" name=\"action\" value=\"delete\">\
         <input type=\"hidden\" name=\"id\" value=\"{}\">\
         <button type=\"submit\" class=\"danger\">Удалить</button></form>",
        id
    );
    html.push_str("</div></td>\n</tr>\n");
}
