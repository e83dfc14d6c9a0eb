//! Vitrine WASM
//!
//! WebAssembly bindings for the storefront forms. The page script forwards
//! input, blur and submit events to a [`StorefrontForm`] and writes the
//! returned views back into the DOM, so the browser runs exactly the masks
//! and validators the server uses.

use chrono::NaiveDate;
use serde::Serialize;
use vitrine_forms::{
    parse_viacep, FieldView, FormConfig, FormOrchestrator, FormResult, FormSnapshot,
    PostalLookupRequest, StorefrontConfig, SubmitError, SubmitGate,
};
use vitrine_validation as core;
use vitrine_validation::FieldKind;
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validation failure returned to JavaScript
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FieldError {
    pub code: String,
    pub message: String,
}

impl From<&core::ValidationError> for FieldError {
    fn from(err: &core::ValidationError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Submission gate as seen by the page script
#[derive(Serialize, Debug)]
#[serde(tag = "status", rename_all = "camelCase")]
enum SubmitStatus {
    Blocked {
        focus: Option<String>,
        result: FormResult,
    },
    Ready {
        result: FormResult,
        snapshot: FormSnapshot,
    },
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_kind(kind: &str) -> Result<FieldKind, JsValue> {
    kind.parse::<FieldKind>().map_err(js_error)
}

fn parse_today(today: Option<String>) -> Result<Option<NaiveDate>, JsValue> {
    match today.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => core::parse_date(value)
            .map(Some)
            .ok_or_else(|| JsValue::from_str(&format!("Invalid date '{}'", value))),
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Masks `value` for display in a field of `kind`
///
/// # Example (JavaScript)
/// ```javascript
/// input.value = mask('cpf', input.value); // "111.444.777-35"
/// ```
#[wasm_bindgen]
pub fn mask(kind: &str, value: &str) -> Result<String, JsValue> {
    Ok(core::mask(parse_kind(kind)?, value))
}

/// Reduces a displayed value back to its underlying form
#[wasm_bindgen]
pub fn unmask(kind: &str, value: &str) -> Result<String, JsValue> {
    Ok(core::unmask(parse_kind(kind)?, value))
}

/// Runs the dedicated validator of `kind`
///
/// # Returns
/// `null` when the value passes, otherwise `{ code, message }`
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(kind: &str, value: &str, today: Option<String>) -> Result<JsValue, JsValue> {
    let kind = parse_kind(kind)?;
    let today = parse_today(today)?.unwrap_or_else(local_today);

    match core::validate_kind(kind, value, today) {
        Ok(()) => Ok(JsValue::NULL),
        Err(err) => Ok(serde_wasm_bindgen::to_value(&FieldError::from(&err))?),
    }
}

#[wasm_bindgen(js_name = isValidTaxpayerId)]
pub fn is_valid_taxpayer_id_js(value: &str) -> bool {
    core::is_valid_taxpayer_id(value)
}

#[wasm_bindgen(js_name = isValidPhone)]
pub fn is_valid_phone_js(value: &str) -> bool {
    core::is_valid_phone(value)
}

/// Quick email validation
#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email_js(email: &str) -> bool {
    core::is_valid_email(email)
}

/// Latest birth date accepted by the age check, as `YYYY-MM-DD`, for the
/// `max` attribute of the date input
#[wasm_bindgen(js_name = maxBirthDate)]
pub fn max_birth_date_js(today: Option<String>) -> Result<String, JsValue> {
    let today = parse_today(today)?.unwrap_or_else(local_today);
    Ok(core::max_birth_date(today).format("%Y-%m-%d").to_string())
}

/// One rendered form
#[wasm_bindgen]
pub struct StorefrontForm {
    inner: FormOrchestrator,
}

impl StorefrontForm {
    fn build(config: &FormConfig) -> Result<StorefrontForm, JsValue> {
        let inner = FormOrchestrator::new(config).map_err(js_error)?;
        Ok(StorefrontForm { inner })
    }
}

#[wasm_bindgen]
impl StorefrontForm {
    /// The built-in checkout form
    pub fn checkout() -> Result<StorefrontForm, JsValue> {
        Self::build(&FormConfig::checkout())
    }

    /// The built-in registration form
    pub fn registration() -> Result<StorefrontForm, JsValue> {
        Self::build(&FormConfig::registration())
    }

    /// Form `name` from a `vitrine.toml` document
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(toml: &str, name: &str) -> Result<StorefrontForm, JsValue> {
        let config = StorefrontConfig::from_toml_str(toml)
            .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
        let form = config
            .form(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown form '{}'", name)))?;
        Self::build(form)
    }

    /// Pins the reference date of the age check (`YYYY-MM-DD` or `DD/MM/YYYY`)
    #[wasm_bindgen(js_name = setToday)]
    pub fn set_today(&mut self, today: &str) -> Result<(), JsValue> {
        if let Some(date) = parse_today(Some(today.to_string()))? {
            self.inner.set_today(date);
        }
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }

    /// `"idle"`, `"validating"`, `"blocked"` or `"submitting"`
    pub fn phase(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.phase())?)
    }

    #[wasm_bindgen(getter, js_name = submitEnabled)]
    pub fn submit_enabled(&self) -> bool {
        self.inner.submit_enabled()
    }

    #[wasm_bindgen(getter)]
    pub fn busy(&self) -> bool {
        self.inner.busy()
    }

    /// Keystroke in field `id`; returns `{ id, text, marker }`
    #[wasm_bindgen(js_name = onInput)]
    pub fn on_input(&mut self, id: &str, value: &str) -> Result<JsValue, JsValue> {
        let update = self.inner.on_input(id, value).map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&update)?)
    }

    /// Focus loss on field `id`; returns `{ update, lookup }` where `lookup`
    /// is the postal lookup to fire, if any
    #[wasm_bindgen(js_name = onBlur)]
    pub fn on_blur(&mut self, id: &str) -> Result<JsValue, JsValue> {
        let outcome = self.inner.on_blur(id).map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    /// Runs a full validation pass without changing the submission phase
    pub fn validate(&mut self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.validate())?)
    }

    /// Validates and, if the form passes, disables submission until
    /// [`finish_submit`](Self::finish_submit) is called
    #[wasm_bindgen(js_name = beginSubmit)]
    pub fn begin_submit(&mut self) -> Result<JsValue, JsValue> {
        let status = match self.inner.begin_submit().map_err(js_error)? {
            SubmitGate::Blocked { result, focus } => SubmitStatus::Blocked { focus, result },
            SubmitGate::Ready { result, snapshot } => SubmitStatus::Ready { result, snapshot },
        };
        Ok(serde_wasm_bindgen::to_value(&status)?)
    }

    /// Reports the end of the submit request; `error` is its failure message
    #[wasm_bindgen(js_name = finishSubmit)]
    pub fn finish_submit(&mut self, error: Option<String>) -> Result<(), JsValue> {
        let outcome = match error {
            None => Ok(()),
            Some(message) => Err(SubmitError::Failed(message)),
        };
        self.inner.finish_submit(&outcome).map_err(js_error)
    }

    /// Applies the raw ViaCEP body fetched for a lookup returned by
    /// [`on_blur`](Self::on_blur)
    #[wasm_bindgen(js_name = applyPostalResponse)]
    pub fn apply_postal_response(
        &mut self,
        field_id: &str,
        postal_code: &str,
        body: &str,
    ) -> Result<JsValue, JsValue> {
        let request = PostalLookupRequest {
            field_id: field_id.to_string(),
            postal_code: postal_code.to_string(),
        };
        let outcome = parse_viacep(body);
        if let Err(err) = &outcome {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "Postal lookup for {} failed: {}",
                postal_code, err
            )));
        }
        let applied = self.inner.apply_lookup(&request, outcome).map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&applied)?)
    }

    /// Every field's `{ id, text, marker }` in declaration order
    pub fn views(&self) -> Result<JsValue, JsValue> {
        let views: Vec<FieldView> = self.inner.views();
        Ok(serde_wasm_bindgen::to_value(&views)?)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
