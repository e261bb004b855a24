mod test_answer_and_ice_relay;
mod test_relay_before_join_rejected;
mod test_relay_is_room_scoped;
