pub mod car_controller;
