//! The store's resource kinds.
//!
//! Each kind is a marker type implementing [`ResourceKind`]; the record
//! itself is always a [`Resource<K>`](crate::rest::Resource).

use crate::rest::{ResourceEndpoint, ResourceKind};

macro_rules! resource_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            create: [$($create:literal),* $(,)?],
            update: [$($update:literal),* $(,)?],
            zero: [$($zero:literal),* $(,)?] $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name;

        impl ResourceKind for $name {
            const NAME: &'static str = stringify!($name);
            const IGNORE_ON_CREATE: &'static [&'static str] = &[$($create),*];
            const IGNORE_ON_UPDATE: &'static [&'static str] = &[$($update),*];
            const IGNORE_IF_ZERO: &'static [&'static str] = &[$($zero),*];
        }
    };
}

macro_rules! endpoint {
    ($($name:ident => $path:literal),* $(,)?) => {
        $(
            impl ResourceEndpoint for $name {
                const PATH: &'static str = $path;
            }
        )*
    };
}

resource_kind! {
    /// An untyped record, used for endpoints without a dedicated kind.
    Record { create: [], update: [], zero: [] }
}

resource_kind! {
    /// A catalog product (`/products`).
    Product {
        create: ["date_created", "date_modified"],
        update: [
            "id",
            "rating_total",
            "rating_count",
            "date_created",
            "date_modified",
            "date_last_imported",
            "number_sold",
            "brand",
            "images",
            "discount_rules",
            "configurable_fields",
            "custom_fields",
            "videos",
            "skus",
            "rules",
            "option_set",
            "options",
            "tax_class",
        ],
        zero: ["tax_class_id"],
    }
}

resource_kind! {
    /// An order (`/orders`). Every field is sent as-is.
    Order { create: [], update: [], zero: [] }
}

resource_kind! {
    /// A customer account (`/customers`).
    Customer { create: ["id"], update: ["id"], zero: [] }
}

resource_kind! {
    /// A catalog category (`/categories`).
    Category {
        create: ["id", "parent_category_list"],
        update: ["id", "parent_category_list"],
        zero: [],
    }
}

resource_kind! {
    /// A product brand (`/brands`).
    Brand { create: ["id"], update: ["id"], zero: [] }
}

resource_kind! {
    /// A discount coupon (`/coupons`).
    Coupon {
        create: ["id", "num_uses"],
        update: ["id", "num_uses"],
        zero: [],
    }
}

resource_kind! {
    /// A shipment of an order (`/orders/{order_id}/shipments`).
    Shipment {
        create: ["id", "order_id", "date_created", "customer_id", "shipping_method"],
        update: ["id", "order_id", "date_created", "customer_id", "shipping_method", "items"],
        zero: [],
    }
}

resource_kind! {
    /// A webhook subscription (`/hooks`).
    Webhook { create: ["id"], update: ["id"], zero: [] }
}

resource_kind! {
    /// A storefront web page (`/pages`).
    Page { create: ["id"], update: ["id"], zero: [] }
}

resource_kind! {
    /// A store currency (`/currencies`).
    Currency {
        create: ["date_created", "date_modified"],
        update: ["id", "date_created", "date_modified"],
        zero: [],
    }
}

resource_kind! {
    /// A gift certificate (`/gift_certificates`).
    GiftCertificate { create: ["id"], update: ["id"], zero: [] }
}

endpoint! {
    Product => "/products",
    Order => "/orders",
    Customer => "/customers",
    Category => "/categories",
    Brand => "/brands",
    Coupon => "/coupons",
    Webhook => "/hooks",
    Page => "/pages",
    Currency => "/currencies",
    GiftCertificate => "/gift_certificates",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_type_names() {
        assert_eq!(Product::NAME, "Product");
        assert_eq!(GiftCertificate::NAME, "GiftCertificate");
    }

    #[test]
    fn test_webhooks_live_under_hooks() {
        assert_eq!(Webhook::PATH, "/hooks");
        assert_eq!(GiftCertificate::PATH, "/gift_certificates");
    }

    #[test]
    fn test_order_has_no_ignored_fields() {
        assert!(Order::IGNORE_ON_CREATE.is_empty());
        assert!(Order::IGNORE_ON_UPDATE.is_empty());
    }

    #[test]
    fn test_shipment_update_extends_create_list() {
        for field in Shipment::IGNORE_ON_CREATE {
            assert!(Shipment::IGNORE_ON_UPDATE.contains(field));
        }
        assert!(Shipment::IGNORE_ON_UPDATE.contains(&"items"));
    }
}
