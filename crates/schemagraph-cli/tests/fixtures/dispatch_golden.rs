// @generated by schemagraph. Do not edit.

pub const SHAPE_DISCRIMINATOR: &str = "!type";

#[doc = " Decode a `shapes::Shape` by its `!type` property."]
pub fn decode_shape(
    value: &::serde_json::Value,
) -> ::core::result::Result<::std::boxed::Box<dyn crate::fixtures::shapes::Shape>, ::schemagraph_core::decode::DecodeError> {
    let label = ::schemagraph_core::decode::read_discriminator(value, "shapes::Shape", SHAPE_DISCRIMINATOR)?;
    let option = ::schemagraph_core::decode::strip_discriminator(value, SHAPE_DISCRIMINATOR);
    match label {
        "Circle" => ::core::result::Result::Ok(::std::boxed::Box::new(
            ::serde_json::from_value::<crate::fixtures::shapes::Circle>(option)?,
        )),
        "Rectangle" => ::core::result::Result::Ok(::std::boxed::Box::new(
            ::serde_json::from_value::<crate::fixtures::shapes::Rectangle>(option)?,
        )),
        other => ::core::result::Result::Err(
            ::schemagraph_core::decode::DecodeError::unknown("shapes::Shape", SHAPE_DISCRIMINATOR, other),
        ),
    }
}

#[doc = " Serialize an option of `shapes::Shape` with its discriminator label in front."]
pub fn encode_shape<T: ::serde::Serialize + ?Sized>(
    label: &str,
    option: &T,
) -> ::core::result::Result<::serde_json::Value, ::serde_json::Error> {
    let value = ::serde_json::to_value(option)?;
    ::core::result::Result::Ok(
        ::schemagraph_core::decode::insert_discriminator(value, SHAPE_DISCRIMINATOR, label),
    )
}

pub const PAYMENT_DISCRIMINATOR: &str = "kind";

#[doc = " Decode a `billing::Payment` by its `kind` property."]
pub fn decode_payment(
    value: &::serde_json::Value,
) -> ::core::result::Result<crate::fixtures::billing::Payment, ::schemagraph_core::decode::DecodeError> {
    let label = ::schemagraph_core::decode::read_discriminator(value, "billing::Payment", PAYMENT_DISCRIMINATOR)?;
    let option = ::schemagraph_core::decode::strip_discriminator(value, PAYMENT_DISCRIMINATOR);
    match label {
        "card" => {
            let source = ::serde_json::from_value::<crate::fixtures::billing::CardPayment>(option)?;
            crate::fixtures::billing::from_card(source).map_err(|err| {
                ::schemagraph_core::decode::DecodeError::conversion("billing::Payment", "card", err)
            })
        }
        other => ::core::result::Result::Err(
            ::schemagraph_core::decode::DecodeError::unknown("billing::Payment", PAYMENT_DISCRIMINATOR, other),
        ),
    }
}

#[doc = " Serialize an option of `billing::Payment` with its discriminator label in front."]
pub fn encode_payment<T: ::serde::Serialize + ?Sized>(
    label: &str,
    option: &T,
) -> ::core::result::Result<::serde_json::Value, ::serde_json::Error> {
    let value = ::serde_json::to_value(option)?;
    ::core::result::Result::Ok(
        ::schemagraph_core::decode::insert_discriminator(value, PAYMENT_DISCRIMINATOR, label),
    )
}
