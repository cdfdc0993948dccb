// Crate entry point. Re-export modules so tests and binaries can import them easily.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.
//
// How it is used
// - Tests import modules from this crate root to reach the code under test.
// - The shell binary (src/shell/main.rs) wires adapters into handlers.

pub mod core {
    pub mod catalog;
    pub mod ports;
}

pub mod application {
    pub mod errors;
    pub mod command_handlers {
        pub mod pending_photo_queue;
        pub mod register_account_handler;
    }
    pub mod query_handlers {
        pub mod country_queries;
        pub mod station_queries;
    }
    pub mod sync {
        pub mod gate;
        pub mod outcome;
        pub mod progress;
        pub mod refresh_countries_handler;
        pub mod refresh_stations_handler;
    }
}

pub mod adapters {
    pub mod http {
        pub mod catalog_client;
        pub mod wire;
    }
    pub mod in_memory {
        pub mod in_memory_catalog;
        pub mod in_memory_record_store;
    }
    pub mod sqlite {
        pub mod schema;
        pub mod sqlite_record_store;
    }
}

#[cfg(test)]
pub mod test_support {
    pub mod fixtures {
        pub mod catalog;
    }
}
