use base64::Engine;
use speakwave_core::{ModemConfig, Modulator};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioContext};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmModulator {
    inner: Modulator,
}

#[wasm_bindgen]
impl WasmModulator {
    #[wasm_bindgen(constructor)]
    pub fn new(
        sample_rate: u32,
        symbol_rate: u32,
        freq_high: f64,
        freq_low: f64,
    ) -> Result<WasmModulator, JsValue> {
        let config = ModemConfig::new(sample_rate, symbol_rate, freq_high, freq_low);
        Modulator::new(config)
            .map(|modulator| WasmModulator { inner: modulator })
            .map_err(to_js_error)
    }

    /// Encode bits (one per array element) into WAV container bytes
    /// Returns undefined for an empty bit array
    #[wasm_bindgen]
    pub fn encode(&self, bits: &[u8]) -> Result<Option<Vec<u8>>, JsValue> {
        self.inner.encode(bits).map_err(to_js_error)
    }

    /// HDLC-frame a UTF-8 message and encode it
    #[wasm_bindgen(js_name = encodeMessage)]
    pub fn encode_message(&self, text: &str) -> Result<Option<Vec<u8>>, JsValue> {
        self.inner
            .encode_message(text.as_bytes())
            .map_err(to_js_error)
    }

    /// Encode bits and return a `data:audio/wav;base64,...` URI
    #[wasm_bindgen(js_name = dataUri)]
    pub fn data_uri(&self, bits: &[u8]) -> Result<Option<String>, JsValue> {
        let container = self.inner.encode(bits).map_err(to_js_error)?;
        Ok(container.map(|bytes| {
            format!(
                "data:audio/wav;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(bytes)
            )
        }))
    }
}

/// Web Audio output owned by the page
///
/// Wraps one `AudioContext`; create it from a user gesture and call
/// `close()` when done.
#[wasm_bindgen]
pub struct WasmAudioOutput {
    context: AudioContext,
}

#[wasm_bindgen]
impl WasmAudioOutput {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmAudioOutput, JsValue> {
        Ok(WasmAudioOutput {
            context: AudioContext::new()?,
        })
    }

    /// Decode a WAV container with the browser and start playing it now
    /// Resolves once playback has started
    #[wasm_bindgen]
    pub fn play(&self, container: &[u8]) -> js_sys::Promise {
        let context = self.context.clone();
        let bytes = js_sys::Uint8Array::from(container);
        wasm_bindgen_futures::future_to_promise(async move {
            let decoding = context.decode_audio_data(&bytes.buffer())?;
            let decoded: AudioBuffer = JsFuture::from(decoding).await?.dyn_into()?;

            let source = context.create_buffer_source()?;
            source.set_buffer(Some(&decoded));
            source.connect_with_audio_node(&context.destination())?;
            source.start()?;
            Ok(JsValue::from_f64(decoded.duration()))
        })
    }

    /// Tear down the audio context
    #[wasm_bindgen]
    pub fn close(&self) -> Result<js_sys::Promise, JsValue> {
        self.context.close()
    }
}
