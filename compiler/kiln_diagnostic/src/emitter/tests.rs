use super::*;
use crate::ErrorCode;
use kiln_ir::Span;
use pretty_assertions::assert_eq;

fn render(emitter: TerminalEmitter<Vec<u8>>, diags: &[Diagnostic]) -> String {
    let mut emitter = emitter;
    emitter.emit_all(diags);
    emitter.flush();
    String::from_utf8(emitter.into_inner()).unwrap()
}

#[test]
fn plain_output_uses_file_line_column() {
    let source = "enum A {}\nenum InvalidCodingKeys1 {}";
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("type 'InvalidCodingKeys1' does not conform to protocol 'Decodable'")
        .with_label(Span::new(15, 33), "declared here");
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false)
        .with_source("codable.kiln", source);

    assert_eq!(
        render(emitter, &[diag]),
        "codable.kiln:2:6: error[E2001]: type 'InvalidCodingKeys1' does not conform to \
         protocol 'Decodable'\n"
    );
}

#[test]
fn notes_and_secondary_labels_follow_the_header() {
    let diag = Diagnostic::note(ErrorCode::E2003)
        .with_message("keys")
        .with_label(Span::new(0, 1), "here")
        .with_secondary_label(Span::new(5, 6), "declared here")
        .with_note("extra");
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    let out = render(emitter, &[diag]);
    assert!(out.starts_with("0..1: note[E2003]: keys\n"));
    assert!(out.contains("5..6: declared here"));
    assert!(out.contains("= note: extra"));
}

#[test]
fn colors_wrap_severity_when_enabled() {
    let diag = Diagnostic::error(ErrorCode::E3001).with_message("arity");
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
    assert!(render(emitter, &[diag]).contains("\x1b[1;31merror\x1b[0m"));
}

#[test]
fn summary_pluralizes() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.emit_summary(2, 1);
    let out = String::from_utf8(emitter.into_inner()).unwrap();
    assert_eq!(out, "2 errors and 1 warning emitted\n");
}

#[test]
fn auto_mode_follows_tty() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}
