//! Server-rendered HTML pages. Every interpolated value goes through
//! `escape`.

use portal_types::models::User;

use crate::session::Flash;

pub fn index(flashes: &[Flash], username: Option<&str>) -> String {
    let body = match username {
        Some(name) => format!(
            r#"<p>Signed in as <strong>{}</strong>.</p>
<p><a href="/panel">Panel</a> | <a href="/logout">Log out</a></p>"#,
            escape(name)
        ),
        None => r#"<p>Welcome. Please log in or create an account.</p>
<p><a href="/login">Log in</a> | <a href="/register">Register</a></p>"#
            .to_string(),
    };
    layout("Home", flashes, &body)
}

pub fn login(flashes: &[Flash], error: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
{}<form method="post" action="/login">
  <label>Username <input type="text" name="username"></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Log in</button>
</form>
<p>No account? <a href="/register">Register</a></p>"#,
        error_block(error)
    );
    layout("Log in", flashes, &body)
}

pub fn register(flashes: &[Flash], error: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Register</h1>
{}<form method="post" action="/register">
  <label>Username <input type="text" name="username"></label>
  <label>Email <input type="email" name="email"></label>
  <label>Password <input type="password" name="password1"></label>
  <label>Confirm password <input type="password" name="password2"></label>
  <button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
        error_block(error)
    );
    layout("Register", flashes, &body)
}

pub fn panel(flashes: &[Flash], user: &User, username: &str) -> String {
    let body = format!(
        r#"<h1>Welcome, {}</h1>
<table>
  <tr><th>ID</th><td>{}</td></tr>
  <tr><th>Username</th><td>{}</td></tr>
  <tr><th>Email</th><td>{}</td></tr>
</table>
<p><a href="/logout">Log out</a></p>"#,
        escape(username),
        user.id,
        escape(&user.username),
        escape(&user.email)
    );
    layout("Panel", flashes, &body)
}

fn layout(title: &str, flashes: &[Flash], body: &str) -> String {
    let notices: String = flashes
        .iter()
        .map(|f| {
            format!(
                "<p class=\"flash flash-{}\">{}</p>\n",
                escape(&f.category),
                escape(&f.message)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{}</title></head>
<body>
<nav><a href="/">Home</a></nav>
{}{}
</body>
</html>
"#,
        escape(title),
        notices,
        body
    )
}

fn error_block(error: Option<&str>) -> String {
    error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape(e)))
        .unwrap_or_default()
}

pub fn escape(input: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn panel_escapes_user_fields() {
        let user = User {
            id: 7,
            username: "<b>eve</b>".into(),
            email: "eve@x.com".into(),
        };
        let html = panel(&[], &user, &user.username);
        assert!(html.contains("&lt;b&gt;eve&lt;/b&gt;"));
        assert!(!html.contains("<b>eve</b>"));
        assert!(html.contains("<td>7</td>"));
    }

    #[test]
    fn login_shows_error_only_when_present() {
        assert!(!login(&[], None).contains("class=\"error\""));
        assert!(login(&[], Some("wrong username or password")).contains("wrong username or password"));
    }
}
