use super::{Expr, Operator};

const GREEK: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

// Upper-case greek letters that have their own LaTeX command
const GREEK_UPPER: [&str; 11] = [
    "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

/// Typeset an expression tree as LaTeX math (without delimiters).
pub fn to_latex(expr: &Expr) -> String {
    match expr {
        Expr::Number(text) => number(text),
        Expr::Symbol(name) => symbol(name),
        Expr::Negate(inner) => format!("- {}", wrap_below(inner, 2)),
        Expr::Binary(left, op, right) => binary(left, *op, right),
        Expr::Call(name, args) => call(name, args),
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary(_, Operator::Add | Operator::Subtract, _) => 1,
        Expr::Negate(_) => 2,
        Expr::Binary(_, Operator::Multiply | Operator::Divide, _) => 3,
        Expr::Binary(_, Operator::Power, _) => 4,
        Expr::Number(_) | Expr::Symbol(_) | Expr::Call(_, _) => 5,
    }
}

fn parens(body: &str) -> String {
    format!("\\left({}\\right)", body)
}

/// Render `expr`, parenthesized when it binds looser than `level`.
fn wrap_below(expr: &Expr, level: u8) -> String {
    let body = to_latex(expr);
    if precedence(expr) < level {
        parens(&body)
    } else {
        body
    }
}

fn starts_with_number(expr: &Expr) -> bool {
    match expr {
        Expr::Number(_) => true,
        Expr::Binary(left, Operator::Multiply | Operator::Power, _) => starts_with_number(left),
        _ => false,
    }
}

fn binary(left: &Expr, op: Operator, right: &Expr) -> String {
    match op {
        Operator::Add => match right {
            Expr::Negate(inner) => format!("{} - {}", to_latex(left), wrap_below(inner, 2)),
            _ => format!("{} + {}", to_latex(left), to_latex(right)),
        },
        Operator::Subtract => format!("{} - {}", to_latex(left), wrap_below(right, 2)),
        Operator::Multiply => {
            let separator = if starts_with_number(right) {
                " \\cdot "
            } else {
                " "
            };
            format!(
                "{}{}{}",
                wrap_below(left, 2),
                separator,
                wrap_below(right, 3)
            )
        }
        Operator::Divide => format!("\\frac{{{}}}{{{}}}", to_latex(left), to_latex(right)),
        Operator::Power => format!("{}^{{{}}}", wrap_below(left, 5), to_latex(right)),
    }
}

fn call(name: &str, args: &[Expr]) -> String {
    let rendered: Vec<String> = args.iter().map(to_latex).collect();
    let joined = rendered.join(", ");

    match (name, rendered.as_slice()) {
        ("sqrt", [single]) => format!("\\sqrt{{{}}}", single),
        ("exp", [single]) => format!("e^{{{}}}", single),
        ("abs", [single]) => format!("\\left|{}\\right|", single),
        ("ln" | "log", [single]) => format!("\\log{{{}}}", parens(single)),
        ("sin" | "cos" | "tan" | "max" | "min", _) => {
            format!("\\{}{{{}}}", name, parens(&joined))
        }
        _ => format!("\\operatorname{{{}}}{{{}}}", symbol(name), parens(&joined)),
    }
}

fn number(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    match lower.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent = exponent
                .parse::<i32>()
                .map(|e| e.to_string())
                .unwrap_or_else(|_| exponent.to_string());
            format!("{} \\cdot 10^{{{}}}", mantissa, exponent)
        }
        None => text.to_string(),
    }
}

fn greek(name: &str) -> Option<String> {
    if GREEK.contains(&name) || GREEK_UPPER.contains(&name) {
        Some(format!("\\{}", name))
    } else {
        None
    }
}

/// Typeset a symbol name: `A_tot` → `A_{tot}`, `x1` → `x_{1}`, `alpha` → `\alpha`.
fn symbol(name: &str) -> String {
    let mut parts = name.split('_');
    let base = parts.next().unwrap_or_default();
    let subscripts: Vec<&str> = parts.filter(|p| !p.is_empty()).collect();

    if base.is_empty() {
        return name.replace('_', "\\_");
    }

    let base_latex = |text: &str| greek(text).unwrap_or_else(|| text.to_string());

    if !subscripts.is_empty() {
        let subs: Vec<String> = subscripts.iter().map(|s| base_latex(*s)).collect();
        return format!("{}_{{{}}}", base_latex(base), subs.join(" "));
    }

    // trailing digits become a subscript
    let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
    if !stem.is_empty() && stem.len() < base.len() {
        return format!("{}_{{{}}}", base_latex(stem), &base[stem.len()..]);
    }

    base_latex(base)
}
