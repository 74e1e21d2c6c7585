//! Helpers mínimos de HTML

/// Escapar texto para contenido y atributos
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

/// Documento HTML completo con la navegación lateral
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<aside class="sidebar">
<nav>
<a href="/">Vehicles</a>
<a href="/add-car">Add Car</a>
</nav>
</aside>
<main class="content">
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}
