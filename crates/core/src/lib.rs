//! Face-controlled input for small retro games.
//!
//! Layout follows one directory per concern, each split into `domain`
//! (traits and pure logic) and `infrastructure` (camera, model runtime,
//! terminal backends).

pub mod app {
    pub mod app_loop;
    pub mod app_state;
    pub mod loop_logger;
    pub mod menu;
}

pub mod camera {
    pub mod domain {
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod face_landmarks;
        pub mod face_metrics;
        pub mod face_observation;
        pub mod landmark_detector;
    }
    pub mod infrastructure;
}

pub mod games {
    pub mod builtin;
    pub mod domain {
        pub mod game_plugin;
        pub mod game_registry;
    }
    pub mod infrastructure;
}

pub mod input {
    pub mod domain {
        pub mod edge_trigger;
        pub mod expression_mapper;
        pub mod input_event;
        pub mod input_provider;
        pub mod key_state;
        pub mod provider_config;
        pub mod provider_error;
    }
    pub mod infrastructure;
}

pub mod runtime {
    pub mod domain {
        pub mod frame_clock;
        pub mod pixel_canvas;
        pub mod runtime;
        pub mod screen;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod model_resolver;
    pub mod settings;
}
