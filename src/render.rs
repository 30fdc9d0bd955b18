// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered HTML views.
//!
//! Small enough that a template engine would be overhead; every
//! user-sourced value goes through `escape_html`.

use crate::models::Profile;
use crate::services::ViewState;

pub const APP_NAME: &str = "Linkstash";

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:42rem;margin:2rem auto;padding:0 1rem;color:#1e293b}\
nav{display:flex;gap:1rem;margin-bottom:2rem;border-bottom:1px solid #e2e8f0;padding-bottom:.75rem}\
nav a{text-decoration:none;color:#334155;font-weight:600}\
h1{margin:.25rem 0}.meta{color:#64748b;font-size:.85rem;text-transform:uppercase}\
.lead{color:#475569}.card{border:1px solid #e2e8f0;border-radius:.75rem;padding:1.25rem;margin:1rem 0}\
.banner{border:1px solid #fecdd3;background:#fff1f2;color:#be123c;border-radius:.5rem;padding:.75rem;margin:1rem 0}\
.field-error{color:#e11d48;font-size:.8rem;margin:.25rem 0 0}\
label{display:block;font-size:.85rem;font-weight:600;margin-top:.75rem}\
input{width:100%;padding:.5rem;border:1px solid #cbd5e1;border-radius:.5rem;margin-top:.25rem}\
button{margin-top:1rem;padding:.5rem 1rem;border:0;border-radius:.5rem;background:#0f172a;color:#fff;font-weight:600;cursor:pointer}\
.item{display:flex;justify-content:space-between;align-items:center;border:1px solid #f1f5f9;border-radius:.5rem;padding:.75rem;margin:.5rem 0}\
.item small{display:block;color:#64748b}.item form{margin:0}.item button{margin:0;background:#f1f5f9;color:#475569}";

/// Escape a string for safe interpolation into HTML text or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Human-readable creation date, falling back to the raw value.
pub fn format_date(rfc3339: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| rfc3339.to_string())
}

fn page(title: &str, nav: bool, body: &str) -> String {
    let nav_html = if nav {
        r#"<nav><a href="/">Dashboard</a><a href="/bookmarks">Bookmarks</a><a href="/settings">Settings</a></nav>"#
    } else {
        ""
    };

    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} · {}</title><style>{}</style></head>\
         <body>{}{}</body></html>",
        escape_html(title),
        APP_NAME,
        STYLE,
        nav_html,
        body
    )
}

fn banner(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"<div class="banner">{}</div>"#, escape_html(message)),
        None => String::new(),
    }
}

fn field_error(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(r#"<p class="field-error">{}</p>"#, escape_html(message)),
        None => String::new(),
    }
}

pub fn dashboard_page(bookmark_count: usize) -> String {
    let body = format!(
        r#"<main>
<p class="meta">Dashboard</p><h1>Bookmarks</h1>
<p class="lead">Save your favourite links.</p>
<a class="card" href="/bookmarks" style="display:block"><strong>Bookmarks</strong>
<span style="float:right;font-size:1.5rem;font-weight:700">{}</span>
<p class="lead">Saved links</p></a>
<a class="card" href="/settings" style="display:block"><strong>Settings</strong>
<p class="lead">Account and preferences</p></a>
</main>"#,
        bookmark_count
    );
    page("Dashboard", true, &body)
}

pub fn bookmarks_page(view: &ViewState) -> String {
    let list = if view.loading {
        r#"<p class="lead">Loading...</p>"#.to_string()
    } else if view.bookmarks.is_empty() {
        r#"<p class="lead">No bookmarks yet. Add one to get started.</p>"#.to_string()
    } else {
        view.bookmarks
            .iter()
            .map(|bookmark| {
                format!(
                    r#"<div class="item"><div>
<a href="{url}" target="_blank" rel="noopener noreferrer">{title}</a>
<small>{url}</small><small>Added {date}</small></div>
<form method="post" action="/bookmarks/{id}/delete"><button type="submit">Delete</button></form>
</div>"#,
                    url = escape_html(&bookmark.url),
                    title = escape_html(&bookmark.title),
                    date = format_date(&bookmark.created_at),
                    id = escape_html(&bookmark.id),
                )
            })
            .collect()
    };

    let body = format!(
        r#"<main>
<p class="meta">Collection</p><h1>Bookmarks</h1>
<p class="lead">Save your favourite links.</p>
{banner}
<div class="card"><h2>Add a bookmark</h2>
<form method="post" action="/bookmarks">
<label for="title">Title</label>
<input id="title" name="title" value="{title}" placeholder="My favourite site">
{title_error}
<label for="url">URL</label>
<input id="url" name="url" value="{url}" placeholder="https://example.com">
{url_error}
<button type="submit">Add bookmark</button>
</form></div>
<div class="card"><h2>Saved bookmarks <small>{count} total</small></h2>
{list}</div>
</main>"#,
        banner = banner(view.error.as_deref()),
        title = escape_html(&view.form.title),
        title_error = field_error(view.form.title_error.as_deref()),
        url = escape_html(&view.form.url),
        url_error = field_error(view.form.url_error.as_deref()),
        count = view.bookmarks.len(),
        list = list,
    );
    page("Bookmarks", true, &body)
}

pub fn settings_page(profile: Option<&Profile>, email: Option<&str>, error: Option<&str>) -> String {
    let name = profile
        .and_then(|p| p.full_name.as_deref())
        .unwrap_or("—");
    let email = profile
        .map(|p| p.email.as_str())
        .or(email)
        .unwrap_or("—");

    let body = format!(
        r#"<main>
<p class="meta">Preferences</p><h1>Settings</h1>
<p class="lead">Manage your account and preferences.</p>
{banner}
<div class="card"><h2>Profile</h2>
<p><small class="meta">Name</small><br>{name}</p>
<p><small class="meta">Email</small><br>{email}</p></div>
<div class="card"><h2>Account</h2>
<p class="lead">Sign out of your account on this device.</p>
<form method="post" action="/auth/logout"><button type="submit">Sign Out</button></form></div>
<div class="card"><h2>About</h2>
<p class="lead">{app} keeps your bookmarks in a hosted backend with row-level security.</p></div>
</main>"#,
        banner = banner(error),
        name = escape_html(name),
        email = escape_html(email),
        app = APP_NAME,
    );
    page("Settings", true, &body)
}

fn redirect_field(redirect: Option<&str>) -> String {
    match redirect {
        Some(target) => format!(
            r#"<input type="hidden" name="redirect" value="{}">"#,
            escape_html(target)
        ),
        None => String::new(),
    }
}

pub fn login_page(redirect: Option<&str>, email: &str, error: Option<&str>) -> String {
    let body = format!(
        r#"<main>
<p class="meta">Welcome back</p><h1>Log in</h1>
{banner}
<div class="card"><form method="post" action="/auth/login">
{redirect}
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
<button type="submit">Log in</button>
</form></div>
<p class="lead">No account? <a href="/auth/signup">Sign up</a></p>
</main>"#,
        banner = banner(error),
        redirect = redirect_field(redirect),
        email = escape_html(email),
    );
    page("Log in", false, &body)
}

pub fn signup_page(
    redirect: Option<&str>,
    email: &str,
    full_name: &str,
    error: Option<&str>,
) -> String {
    let body = format!(
        r#"<main>
<p class="meta">Get started</p><h1>Sign up</h1>
{banner}
<div class="card"><form method="post" action="/auth/signup">
{redirect}
<label for="full_name">Name</label>
<input id="full_name" name="full_name" value="{full_name}">
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
<button type="submit">Sign up</button>
</form></div>
<p class="lead">Already have an account? <a href="/auth/login">Log in</a></p>
</main>"#,
        banner = banner(error),
        redirect = redirect_field(redirect),
        email = escape_html(email),
        full_name = escape_html(full_name),
    );
    page("Sign up", false, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-03-05T12:30:00Z"), "Mar 5, 2026");
        // Unparseable values fall through untouched
        assert_eq!(format_date("whenever"), "whenever");
    }
}
