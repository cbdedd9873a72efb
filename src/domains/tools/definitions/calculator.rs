//! Calculator tool definition.
//!
//! Evaluates arithmetic expressions with a dedicated tokenizer and
//! recursive-descent parser limited to the four basic operators,
//! parentheses and numeric literals. No general-purpose code evaluation
//! is involved anywhere.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type, schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::common::error_result;
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the calculator tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculatorParams {
    /// The expression to evaluate.
    #[schemars(description = "Arithmetic expression (e.g. 5+3, 10*2, (2+3)*4)")]
    pub expression: String,
}

// ============================================================================
// Output Structure
// ============================================================================

/// Result of an evaluation.
#[derive(Debug, Serialize, JsonSchema)]
struct CalculationResult {
    /// The sanitized expression that was evaluated.
    expression: String,
    /// The numeric result.
    result: f64,
}

// ============================================================================
// Expression evaluation
// ============================================================================

/// Remove every character that is not a digit, one of `+-*/().`, or
/// whitespace, then trim.
fn sanitize(expression: &str) -> String {
    expression
        .chars()
        .filter(|c| c.is_ascii_digit() || "+-*/().".contains(*c) || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ToolError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut lexeme = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        lexeme.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = lexeme
                    .parse::<f64>()
                    .map_err(|_| ToolError::invalid_input(format!("invalid number literal '{}'", lexeme)))?;
                tokens.push(Token::Number(value));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            other => {
                return Err(ToolError::invalid_input(format!(
                    "unexpected character '{}'",
                    other
                )));
            }
        }
    }

    Ok(tokens)
}

/// Recursive-descent parser over the token stream.
///
/// Grammar:
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := ('+' | '-') factor | number | '(' expr ')'
/// ```
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_expr(&mut self) -> Result<f64, ToolError> {
        let mut value = self.parse_term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.parse_term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn parse_term(&mut self) -> Result<f64, ToolError> {
        let mut value = self.parse_factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.parse_factor()?;
                }
                Token::Slash => {
                    self.advance();
                    value /= self.parse_factor()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn parse_factor(&mut self) -> Result<f64, ToolError> {
        match self.advance() {
            Some(Token::Plus) => self.parse_factor(),
            Some(Token::Minus) => Ok(-self.parse_factor()?),
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ToolError::invalid_input("missing closing parenthesis")),
                }
            }
            Some(token) => Err(ToolError::invalid_input(format!(
                "unexpected {}",
                token.describe()
            ))),
            None => Err(ToolError::invalid_input("unexpected end of expression")),
        }
    }
}

/// Evaluate a sanitized expression to a numeric value.
fn evaluate(expression: &str) -> Result<f64, ToolError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(ToolError::invalid_input("no expression found"));
    }
    let mut parser = Parser::new(tokens);
    let value = parser.parse_expr()?;
    if let Some(trailing) = parser.peek() {
        return Err(ToolError::invalid_input(format!(
            "unexpected trailing {}",
            trailing.describe()
        )));
    }
    Ok(value)
}

/// Render the result the way a calculator would: integers without a
/// fractional part, everything else as-is.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Calculator tool - evaluates arithmetic expressions.
pub struct CalculatorTool;

impl CalculatorTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "calculator";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Evaluate an arithmetic expression built from numbers, + - * /, parentheses and whitespace. Any other character is stripped before evaluation.";

    /// Execute the tool logic.
    pub fn execute(params: &CalculatorParams) -> CallToolResult {
        info!("Calculator tool called: '{}'", params.expression);

        let sanitized = sanitize(&params.expression);
        if sanitized.is_empty() {
            return error_result("no expression found");
        }

        match evaluate(&sanitized) {
            Ok(value) if value.is_finite() => {
                let summary = format!("{} = {}", sanitized, format_number(value));
                let result = CalculationResult {
                    expression: sanitized,
                    result: value,
                };
                CallToolResult {
                    content: vec![Content::text(summary)],
                    structured_content: Some(serde_json::to_value(&result).unwrap()),
                    is_error: Some(false),
                    meta: None,
                }
            }
            Ok(_) => error_result("result is not a finite number"),
            Err(e) => error_result(&e.to_string()),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(arguments: serde_json::Value) -> Result<serde_json::Value, String> {
        let expression = arguments
            .get("expression")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'expression' parameter".to_string())?
            .to_string();

        let params = CalculatorParams { expression };
        let result = Self::execute(&params);

        serde_json::to_value(&result).map_err(|e| e.to_string())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CalculatorParams>(),
            annotations: None,
            output_schema: Some(schema_for_type::<CalculationResult>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>() -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: CalculatorParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn run(expression: &str) -> CallToolResult {
        CalculatorTool::execute(&CalculatorParams {
            expression: expression.to_string(),
        })
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
        assert_eq!(evaluate("20-6/2").unwrap(), 17.0);
    }

    #[test]
    fn test_evaluate_parentheses() {
        assert_eq!(evaluate("(2+3)*4").unwrap(), 20.0);
        assert_eq!(evaluate("((1+1))*(3-1)").unwrap(), 4.0);
    }

    #[test]
    fn test_evaluate_unary_sign() {
        assert_eq!(evaluate("-5+3").unwrap(), -2.0);
        assert_eq!(evaluate("2*-3").unwrap(), -6.0);
        assert_eq!(evaluate("+7").unwrap(), 7.0);
    }

    #[test]
    fn test_evaluate_decimals() {
        assert_eq!(evaluate("1.5*2").unwrap(), 3.0);
        assert_eq!(evaluate("0.1+0.2").unwrap(), 0.1 + 0.2);
    }

    #[test]
    fn test_evaluate_whitespace() {
        assert_eq!(evaluate("5 + 3").unwrap(), 8.0);
        assert_eq!(evaluate(" ( 1 + 2 ) * 3 ").unwrap(), 9.0);
    }

    #[test]
    fn test_evaluate_malformed() {
        assert!(evaluate("5+").is_err());
        assert!(evaluate("(1+2").is_err());
        assert!(evaluate("1 2").is_err());
        assert!(evaluate("1.2.3").is_err());
        assert!(evaluate("*3").is_err());
    }

    #[test]
    fn test_sanitize_strips_disallowed_characters() {
        assert_eq!(sanitize("2+2abc"), "2+2");
        assert_eq!(sanitize("what is 5*3?"), "5*3");
        assert_eq!(sanitize("1;+2"), "1+2");
    }

    #[test]
    fn test_execute_simple_sum() {
        let result = run("5+3");
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "5+3 = 8");
    }

    #[test]
    fn test_execute_strips_then_evaluates() {
        let result = run("calculate 10 * 2 please");
        assert!(!result.is_error.unwrap_or(false));
        assert!(text_of(&result).ends_with("= 20"));
    }

    #[test]
    fn test_execute_empty_after_strip() {
        let result = run("hello world");
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "no expression found");
    }

    #[test]
    fn test_execute_division_by_zero_is_not_finite() {
        let result = run("1/0");
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "result is not a finite number");
    }

    #[test]
    fn test_execute_fractional_result() {
        let result = run("7/2");
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "7/2 = 3.5");
    }

    #[test]
    fn test_execute_structured_content() {
        let result = run("(2+3)*4");
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["expression"], "(2+3)*4");
        assert_eq!(structured["result"], 20.0);
    }

    #[test]
    fn test_to_tool_declares_output_schema() {
        let tool = CalculatorTool::to_tool();
        let schema = tool.output_schema.expect("output schema");
        assert!(schema.contains_key("properties"));
    }

    #[test]
    fn test_params_deserialize() {
        let json = r#"{"expression": "5+3"}"#;
        let params: CalculatorParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.expression, "5+3");
    }
}
