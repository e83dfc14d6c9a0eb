/// Registration form: name, email and password policy checks
use pretty_assertions::assert_eq;
use rstest::rstest;
use vitrine_forms::{FormConfig, FormOrchestrator, Marker, ValidationError, Validity};

fn registration(nome: &str, email: &str, senha: &str, confirmar: &str) -> FormOrchestrator {
    let mut form = FormOrchestrator::new(&FormConfig::registration()).unwrap();
    form.on_input("nome", nome).unwrap();
    form.on_input("email", email).unwrap();
    form.on_input("senha", senha).unwrap();
    form.on_input("confirmar_senha", confirmar).unwrap();
    form
}

#[test]
fn valid_registration_passes() {
    let mut form = registration("Maria José", "maria@example.com", "s3nh@1", "s3nh@1");
    assert!(form.validate().all_valid);
}

#[rstest]
#[case("M", "maria@example.com", "s3nh@1", "s3nh@1", "nome", ValidationError::InvalidName)]
#[case("Maria", "maria@example", "s3nh@1", "s3nh@1", "email", ValidationError::MalformedEmail)]
#[case("Maria", "maria@example.com", "s3nh@1", "s3nh@2", "confirmar_senha", ValidationError::PasswordMismatch)]
#[case("Maria", "", "s3nh@1", "s3nh@1", "email", ValidationError::MissingRequired)]
fn invalid_registration_reports_field(
    #[case] nome: &str,
    #[case] email: &str,
    #[case] senha: &str,
    #[case] confirmar: &str,
    #[case] field: &str,
    #[case] expected: ValidationError,
) {
    let mut form = registration(nome, email, senha, confirmar);
    let result = form.validate();
    assert!(!result.all_valid);
    assert_eq!(
        result.get(field).unwrap().validity,
        Validity::Invalid(expected)
    );
}

#[test]
fn weak_password_explains_policy() {
    let mut form = registration("Maria", "maria@example.com", "senha", "senha");
    form.validate();
    assert_eq!(
        form.view("senha").unwrap().marker,
        Marker::Invalid(
            "password must have at least 6 characters, a number and a special character (e.g. @, $)"
                .to_string()
        )
    );
    assert_eq!(form.view("confirmar_senha").unwrap().marker, Marker::Valid);
}

#[test]
fn reset_after_success_clears_markers() {
    let mut form = registration("Maria", "maria@example.com", "s3nh@1", "s3nh@1");
    assert!(form.validate().all_valid);
    form.reset();
    assert!(form.views().iter().all(|v| v.marker == Marker::None && v.text.is_empty()));
}
